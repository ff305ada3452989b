use anyhow::{Context, Result};
use hyper::StatusCode;

use shared::types::AccessContext;

use crate::AppState;
use crate::database;
use crate::handlers::http::utils::{deliver_error_json, deliver_success_json};
use crate::handlers::http::{ApiRequest, ApiResponse};

/// GET /api/user/project
///
/// The project recorded in the caller's access context.
pub async fn handle_get_project(
    _req: ApiRequest,
    state: AppState,
    ctx: AccessContext,
) -> Result<ApiResponse> {
    let Some(project_id) = ctx.project_id else {
        return deliver_error_json(
            "NO_PROJECT",
            "No project is assigned to this account",
            StatusCode::NOT_FOUND,
        );
    };

    match database::get_project(&state.db, project_id)
        .await
        .context("Failed to load project")?
    {
        Some(project) => deliver_success_json(Some(project)),
        None => deliver_error_json("NO_PROJECT", "Assigned project no longer exists", StatusCode::NOT_FOUND),
    }
}
