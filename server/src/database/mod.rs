pub mod access;
pub mod activity;
pub mod create;
pub mod login;
pub mod projects;
pub mod users;
pub mod utils;

pub use access::*;
pub use activity::*;
pub use create::*;
pub use login::*;
pub use projects::*;
pub use users::*;
pub use utils::*;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::info;

/// Open the sqlite pool described by `url`, e.g. `sqlite://itams.db?mode=rwc`.
pub async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool> {
    info!("Connecting to database: {}", url);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
        .with_context(|| format!("Failed to open database {}", url))
}

/// Single-connection in-memory pool with the schema applied.  Each call
/// yields an independent, empty database.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .context("Failed to open in-memory database")?;

    create_tables(&pool).await?;
    Ok(pool)
}
