use anyhow::{Context, Result};
use sqlx::SqlitePool;

/// `true` when `user_id` is an active user currently holding `role_id` and
/// that role carries the super-admin flag.  A role id that no longer matches
/// the user's row (stale token) counts as not super-admin.
pub async fn is_super_admin(pool: &SqlitePool, user_id: i64, role_id: i64) -> Result<bool> {
    let flag: Option<bool> = sqlx::query_scalar(
        "SELECT r.is_super_admin
         FROM users u
         JOIN roles r ON r.id = u.role_id
         WHERE u.id = ?1 AND u.role_id = ?2 AND u.is_active = 1",
    )
    .bind(user_id)
    .bind(role_id)
    .fetch_optional(pool)
    .await
    .context("Failed to look up super-admin flag")?;

    Ok(flag.unwrap_or(false))
}

/// The project a user is attached to.  Users belong to at most one project;
/// if several rows exist the lowest project id wins.
pub async fn get_user_project_id(pool: &SqlitePool, user_id: i64) -> Result<Option<i64>> {
    sqlx::query_scalar(
        "SELECT project_id FROM user_projects
         WHERE user_id = ?1
         ORDER BY project_id
         LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to look up user project")
}
