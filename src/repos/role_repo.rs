/*
 * Responsibility
 * - SQLx operations for the roles table
 */
use sqlx::PgPool;

use crate::repos::error::RepoError;

pub async fn find_id_by_name(db: &PgPool, name: &str) -> Result<Option<i64>, RepoError> {
    let id: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT id
        FROM roles
        WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(db)
    .await?;

    Ok(id)
}

/// Role name currently assigned to a user, if any.
pub async fn role_of_user(db: &PgPool, user_id: i64) -> Result<Option<String>, RepoError> {
    let name: Option<String> = sqlx::query_scalar(
        r#"
        SELECT r.name
        FROM roles r
        JOIN users u ON r.id = u.role_id
        WHERE u.id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(name)
}
