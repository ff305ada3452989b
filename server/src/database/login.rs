use anyhow::{Context, Result};
use sqlx::SqlitePool;

use super::utils::get_timestamp;

/// Data needed to verify a login and mint a token.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserAuth {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role_id: Option<i64>,
    pub is_super_admin: bool,
    pub is_active: bool,
}

/// Get user authentication data by username
pub async fn get_user_auth(pool: &SqlitePool, username: &str) -> Result<Option<UserAuth>> {
    sqlx::query_as::<_, UserAuth>(
        "SELECT u.id, u.username, u.password_hash, u.role_id,
                COALESCE(r.is_super_admin, 0) AS is_super_admin,
                u.is_active
         FROM users u
         LEFT JOIN roles r ON r.id = u.role_id
         WHERE u.username = ?1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
    .with_context(|| format!("Failed to load auth row for {}", username))
}

/// Update last login timestamp
pub async fn update_last_login(pool: &SqlitePool, user_id: i64) -> Result<()> {
    sqlx::query("UPDATE users SET last_login = ?1 WHERE id = ?2")
        .bind(get_timestamp())
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to update last_login")?;
    Ok(())
}
