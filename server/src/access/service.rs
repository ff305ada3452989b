use anyhow::Result;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use shared::types::AccessContext;

use super::Principal;
use crate::database;

/// Lookups the access middleware needs to turn a principal into an
/// [`AccessContext`].  Errors are not swallowed by the caller: a failing
/// lookup faults the request.
#[async_trait]
pub trait AccessControlService: Send + Sync {
    async fn is_super_admin(&self, user_id: i64, role_id: i64) -> Result<bool>;

    async fn get_user_project_id(&self, user_id: i64) -> Result<Option<i64>>;
}

/// [`AccessControlService`] backed by the `roles`, `users` and
/// `user_projects` tables.
#[derive(Debug, Clone)]
pub struct SqlAccessControl {
    pool: SqlitePool,
}

impl SqlAccessControl {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessControlService for SqlAccessControl {
    async fn is_super_admin(&self, user_id: i64, role_id: i64) -> Result<bool> {
        database::is_super_admin(&self.pool, user_id, role_id).await
    }

    async fn get_user_project_id(&self, user_id: i64) -> Result<Option<i64>> {
        database::get_user_project_id(&self.pool, user_id).await
    }
}

/// Build the access context for `principal`.
///
/// - user id missing or not numeric → empty context, no lookups
/// - role id missing or not numeric → `role_id` and `is_super_admin` stay
///   `None`, `user_id` and `project_id` are still filled in
pub async fn resolve_context(
    service: &dyn AccessControlService,
    principal: &Principal,
) -> Result<AccessContext> {
    let mut ctx = AccessContext::default();

    let Some(user_id) = principal.user_id() else {
        debug!(
            "Principal {} has no numeric user id; access context left empty",
            principal.name
        );
        return Ok(ctx);
    };
    ctx.user_id = Some(user_id);

    if let Some(role_id) = principal.role_id() {
        ctx.role_id = Some(role_id);
        ctx.is_super_admin = Some(service.is_super_admin(user_id, role_id).await?);
    }

    ctx.project_id = service.get_user_project_id(user_id).await?;

    Ok(ctx)
}
