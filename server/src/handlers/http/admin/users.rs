use anyhow::{Context, Result};
use tracing::info;

use shared::types::AccessContext;

use crate::AppState;
use crate::database;
use crate::handlers::http::utils::deliver_success_json;
use crate::handlers::http::{ApiRequest, ApiResponse};

/// GET /api/admin/users
///
/// Every account with its role, last login and last activity.  The router
/// only lets super-admins this far.
pub async fn handle_list_users(
    _req: ApiRequest,
    state: AppState,
    ctx: AccessContext,
) -> Result<ApiResponse> {
    let users = database::list_users(&state.db)
        .await
        .context("Failed to list users")?;

    info!(
        "Super-admin {:?} listed {} users",
        ctx.user_id,
        users.len()
    );

    deliver_success_json(Some(users))
}
