use anyhow::Result;
use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::database;

/// Sink for "last seen" timestamps.  Writes are best-effort; callers log
/// and drop errors.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Record activity for `username` at unix time `at`.  Returns the number
    /// of rows updated.
    async fn touch(&self, username: &str, at: i64) -> Result<u64>;
}

#[derive(Debug, Clone)]
pub struct SqlActivityStore {
    pool: SqlitePool,
}

impl SqlActivityStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityStore for SqlActivityStore {
    async fn touch(&self, username: &str, at: i64) -> Result<u64> {
        database::update_last_activity(&self.pool, username, at).await
    }
}
