use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Current schema version, stored in `PRAGMA user_version`.
const SCHEMA_VERSION: u32 = 1;

/// Initialize the database schema.  Safe to call on every start.
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    let current_version: u32 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await
        .context("Failed to read schema version")?;

    if current_version >= SCHEMA_VERSION {
        debug!("Database schema already at version {}", current_version);
        return Ok(());
    }

    info!(
        "Database schema at version {}; creating version {}",
        current_version, SCHEMA_VERSION
    );

    // Roles: is_super_admin = 1 grants the /admin tree
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS roles (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            name           TEXT    NOT NULL UNIQUE,
            is_super_admin INTEGER NOT NULL DEFAULT 0
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create roles table")?;

    // Users: last_activity is written by the activity middleware on every
    // authenticated request
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            username      TEXT    NOT NULL UNIQUE,
            password_hash TEXT    NOT NULL,
            role_id       INTEGER,
            created_at    INTEGER NOT NULL,
            last_login    INTEGER,
            last_activity INTEGER,
            is_active     INTEGER NOT NULL DEFAULT 1,
            FOREIGN KEY (role_id) REFERENCES roles(id)
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create users table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS projects (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            name       TEXT    NOT NULL UNIQUE,
            created_at INTEGER NOT NULL
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create projects table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS user_projects (
            user_id    INTEGER NOT NULL,
            project_id INTEGER NOT NULL,
            PRIMARY KEY (user_id, project_id),
            FOREIGN KEY (user_id)    REFERENCES users(id)    ON DELETE CASCADE,
            FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create user_projects table")?;

    // --- Indexes --------------------------------------------------------
    for stmt in [
        "CREATE INDEX IF NOT EXISTS idx_users_username       ON users(username)",
        "CREATE INDEX IF NOT EXISTS idx_users_role           ON users(role_id)",
        "CREATE INDEX IF NOT EXISTS idx_user_projects_user   ON user_projects(user_id)",
    ] {
        sqlx::query(stmt)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to create index: {}", stmt))?;
    }

    sqlx::query(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
        .execute(pool)
        .await
        .context("Failed to store schema version")?;

    Ok(())
}
