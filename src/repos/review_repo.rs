/*
 * Responsibility
 * - SQLx operations for the reviews table
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub book_id: i64,
    pub review_text: String,
    pub rating: i32,
}

pub async fn list_for_book(db: &PgPool, book_id: i64) -> Result<Vec<ReviewRow>, RepoError> {
    let rows = sqlx::query_as::<_, ReviewRow>(
        r#"
        SELECT id, book_id, review_text, rating
        FROM reviews
        WHERE book_id = $1
        ORDER BY id
        "#,
    )
    .bind(book_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn create(
    db: &PgPool,
    book_id: i64,
    review_text: &str,
    rating: i32,
) -> Result<ReviewRow, RepoError> {
    let row = sqlx::query_as::<_, ReviewRow>(
        r#"
        INSERT INTO reviews (book_id, review_text, rating)
        VALUES ($1, $2, $3)
        RETURNING id, book_id, review_text, rating
        "#,
    )
    .bind(book_id)
    .bind(review_text)
    .bind(rating)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn update(
    db: &PgPool,
    review_id: i64,
    review_text: &str,
    rating: i32,
) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        UPDATE reviews
        SET review_text = $2, rating = $3
        WHERE id = $1
        "#,
    )
    .bind(review_id)
    .bind(review_text)
    .bind(rating)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(db: &PgPool, review_id: i64) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM reviews
        WHERE id = $1
        "#,
    )
    .bind(review_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
