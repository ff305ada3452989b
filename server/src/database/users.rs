use anyhow::{Context, Result, bail};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use super::utils::{get_timestamp, hash_password, is_valid_username, sanitize_string};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role_id: Option<i64>,
}

/// Row shape for the admin user listing.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub role_id: Option<i64>,
    pub role_name: Option<String>,
    pub is_super_admin: bool,
    pub is_active: bool,
    pub last_login: Option<i64>,
    pub last_activity: Option<i64>,
}

/// Insert a role, returning its id.
pub async fn create_role(pool: &SqlitePool, name: &str, is_super_admin: bool) -> Result<i64> {
    let result = sqlx::query("INSERT INTO roles (name, is_super_admin) VALUES (?1, ?2)")
        .bind(sanitize_string(name))
        .bind(is_super_admin)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to create role {}", name))?;

    Ok(result.last_insert_rowid())
}

/// Insert a user with a freshly hashed password, returning its id.
pub async fn create_user(pool: &SqlitePool, new_user: NewUser) -> Result<i64> {
    let username = sanitize_string(&new_user.username);
    if !is_valid_username(&username) {
        bail!("Invalid username: {:?}", username);
    }

    let password_hash = hash_password(&new_user.password)?;

    let result = sqlx::query(
        "INSERT INTO users (username, password_hash, role_id, created_at)
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&username)
    .bind(password_hash)
    .bind(new_user.role_id)
    .bind(get_timestamp())
    .execute(pool)
    .await
    .with_context(|| format!("Failed to create user {}", username))?;

    info!("New user created: {}", username);

    Ok(result.last_insert_rowid())
}

/// Enable or disable a login.
pub async fn set_user_active(pool: &SqlitePool, user_id: i64, active: bool) -> Result<()> {
    sqlx::query("UPDATE users SET is_active = ?1 WHERE id = ?2")
        .bind(active)
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to update is_active")?;
    Ok(())
}

/// All users, ordered by id, with their role.
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<UserSummary>> {
    sqlx::query_as::<_, UserSummary>(
        "SELECT u.id, u.username, u.role_id, r.name AS role_name,
                COALESCE(r.is_super_admin, 0) AS is_super_admin,
                u.is_active, u.last_login, u.last_activity
         FROM users u
         LEFT JOIN roles r ON r.id = u.role_id
         ORDER BY u.id",
    )
    .fetch_all(pool)
    .await
    .context("Failed to list users")
}

/// Make sure a super-admin role and a super-admin account named `username`
/// exist.  An existing account keeps its password.
pub async fn bootstrap_super_admin(pool: &SqlitePool, username: &str, password: &str) -> Result<i64> {
    let username = sanitize_string(username);
    let role_id: i64 = match sqlx::query_scalar::<_, i64>(
        "SELECT id FROM roles WHERE is_super_admin = 1 ORDER BY id LIMIT 1",
    )
    .fetch_optional(pool)
    .await
    .context("Failed to look up super-admin role")?
    {
        Some(id) => id,
        None => create_role(pool, "SuperAdmin", true).await?,
    };

    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = ?1")
        .bind(&username)
        .fetch_optional(pool)
        .await
        .context("Failed to look up bootstrap user")?;

    if let Some(user_id) = existing {
        sqlx::query("UPDATE users SET role_id = ?1, is_active = 1 WHERE id = ?2")
            .bind(role_id)
            .bind(user_id)
            .execute(pool)
            .await
            .context("Failed to promote bootstrap user")?;
        info!("Bootstrap super-admin {} already present", username);
        return Ok(user_id);
    }

    create_user(
        pool,
        NewUser {
            username,
            password: password.to_string(),
            role_id: Some(role_id),
        },
    )
    .await
}
