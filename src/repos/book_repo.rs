/*
 * Responsibility
 * - SQLx operations for the books table
 * - Deleting a book cascades to its reviews (FK ON DELETE CASCADE)
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub published_year: i32,
    pub book_picture: Option<String>,
    pub book_description: Option<String>,
    pub genre: Option<String>,
    pub average_rating: Option<f32>,
}

pub struct NewBook<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub published_year: i32,
    pub book_picture: Option<&'a str>,
    pub book_description: Option<&'a str>,
    pub genre: Option<&'a str>,
    pub average_rating: Option<f32>,
}

pub async fn list(db: &PgPool, limit: i64, offset: i64) -> Result<Vec<BookRow>, RepoError> {
    let rows = sqlx::query_as::<_, BookRow>(
        r#"
        SELECT id, title, author, published_year, book_picture, book_description,
               genre, average_rating
        FROM books
        ORDER BY id
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn get(db: &PgPool, book_id: i64) -> Result<Option<BookRow>, RepoError> {
    let row = sqlx::query_as::<_, BookRow>(
        r#"
        SELECT id, title, author, published_year, book_picture, book_description,
               genre, average_rating
        FROM books
        WHERE id = $1
        "#,
    )
    .bind(book_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn create(db: &PgPool, book: NewBook<'_>) -> Result<BookRow, RepoError> {
    let row = sqlx::query_as::<_, BookRow>(
        r#"
        INSERT INTO books
            (title, author, published_year, book_picture, book_description, genre, average_rating)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, title, author, published_year, book_picture, book_description,
                  genre, average_rating
        "#,
    )
    .bind(book.title)
    .bind(book.author)
    .bind(book.published_year)
    .bind(book.book_picture)
    .bind(book.book_description)
    .bind(book.genre)
    .bind(book.average_rating)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn update(
    db: &PgPool,
    book_id: i64,
    book: NewBook<'_>,
) -> Result<Option<BookRow>, RepoError> {
    let row = sqlx::query_as::<_, BookRow>(
        r#"
        UPDATE books
        SET title = $2,
            author = $3,
            published_year = $4,
            book_picture = $5,
            book_description = $6,
            genre = $7,
            average_rating = $8
        WHERE id = $1
        RETURNING id, title, author, published_year, book_picture, book_description,
                  genre, average_rating
        "#,
    )
    .bind(book_id)
    .bind(book.title)
    .bind(book.author)
    .bind(book.published_year)
    .bind(book.book_picture)
    .bind(book.book_description)
    .bind(book.genre)
    .bind(book.average_rating)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn delete(db: &PgPool, book_id: i64) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM books
        WHERE id = $1
        "#,
    )
    .bind(book_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn exists(db: &PgPool, book_id: i64) -> Result<bool, RepoError> {
    let row: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT id
        FROM books
        WHERE id = $1
        "#,
    )
    .bind(book_id)
    .fetch_optional(db)
    .await?;

    Ok(row.is_some())
}
