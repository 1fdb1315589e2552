/*
 * Responsibility
 * - SQLx operations for the users table
 * - Takes a PgPool, returns rows in shapes the service/handler layer needs
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    // Some identities carry no secret and cannot Basic-login.
    pub password: Option<String>,
}

#[derive(Debug, FromRow)]
pub struct UserWithRoleRow {
    pub id: i64,
    pub username: String,
    pub role: Option<String>,
}

pub async fn find_by_username(db: &PgPool, username: &str) -> Result<Option<UserRow>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, username, password
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn create(
    db: &PgPool,
    username: &str,
    password_hash: &str,
    role_id: i64,
) -> Result<i64, RepoError> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO users (username, password, role_id)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .bind(role_id)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(id)
}

pub async fn role_id(db: &PgPool, user_id: i64) -> Result<Option<i64>, RepoError> {
    let row: Option<Option<i64>> = sqlx::query_scalar(
        r#"
        SELECT role_id
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row.flatten())
}

pub async fn assign_role(db: &PgPool, user_id: i64, role_id: i64) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET role_id = $2
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(role_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn exists(db: &PgPool, user_id: i64) -> Result<bool, RepoError> {
    let row: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT id
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row.is_some())
}

pub async fn delete(db: &PgPool, user_id: i64) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_with_roles(db: &PgPool) -> Result<Vec<UserWithRoleRow>, RepoError> {
    let rows = sqlx::query_as::<_, UserWithRoleRow>(
        r#"
        SELECT u.id, u.username, r.name AS role
        FROM users u
        LEFT JOIN roles r ON u.role_id = r.id
        ORDER BY u.id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}
