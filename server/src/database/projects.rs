use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::SqlitePool;

use super::utils::{get_timestamp, sanitize_string};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
}

pub async fn create_project(pool: &SqlitePool, name: &str) -> Result<i64> {
    let result = sqlx::query("INSERT INTO projects (name, created_at) VALUES (?1, ?2)")
        .bind(sanitize_string(name))
        .bind(get_timestamp())
        .execute(pool)
        .await
        .with_context(|| format!("Failed to create project {}", name))?;

    Ok(result.last_insert_rowid())
}

/// Attach a user to a project.  Re-assigning the same pair is a no-op.
pub async fn assign_project(pool: &SqlitePool, user_id: i64, project_id: i64) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO user_projects (user_id, project_id) VALUES (?1, ?2)")
        .bind(user_id)
        .bind(project_id)
        .execute(pool)
        .await
        .context("Failed to assign project")?;
    Ok(())
}

pub async fn get_project(pool: &SqlitePool, project_id: i64) -> Result<Option<Project>> {
    sqlx::query_as::<_, Project>("SELECT id, name, created_at FROM projects WHERE id = ?1")
        .bind(project_id)
        .fetch_optional(pool)
        .await
        .context("Failed to load project")
}
