use anyhow::Result;
use hyper::StatusCode;
use tracing::debug;

use shared::types::{AccessContext, SessionView};

use crate::AppState;
use crate::handlers::http::utils::deliver_serialized_json;
use crate::handlers::http::{ApiRequest, ApiResponse};

/// GET /api/session
///
/// Echo the caller's resolved access context plus the home route its role
/// lands on.  The browser client uses this to seed its role classification
/// after a reload.
pub async fn handle_get_session(
    _req: ApiRequest,
    _state: AppState,
    ctx: AccessContext,
) -> Result<ApiResponse> {
    debug!("Session requested by user {:?}", ctx.user_id);
    deliver_serialized_json(&SessionView::from_context(ctx), StatusCode::OK)
}
