use anyhow::{Context, Result};
use sqlx::SqlitePool;

/// Stamp `users.last_activity` for `username`.  Returns the number of rows
/// touched (0 when the username is unknown).
pub async fn update_last_activity(pool: &SqlitePool, username: &str, at: i64) -> Result<u64> {
    let result = sqlx::query("UPDATE users SET last_activity = ?1 WHERE username = ?2")
        .bind(at)
        .bind(username)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to update last_activity for {}", username))?;

    Ok(result.rows_affected())
}

/// Read back `users.last_activity` for `username`.
pub async fn get_last_activity(pool: &SqlitePool, username: &str) -> Result<Option<i64>> {
    let value: Option<Option<i64>> =
        sqlx::query_scalar("SELECT last_activity FROM users WHERE username = ?1")
            .bind(username)
            .fetch_optional(pool)
            .await
            .context("Failed to read last_activity")?;

    Ok(value.flatten())
}
