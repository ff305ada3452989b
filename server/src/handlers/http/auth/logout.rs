use anyhow::{Context, Result};
use hyper::{Response, StatusCode, header};
use tracing::info;

use crate::AppState;
use crate::handlers::http::utils::{self, AUTH_COOKIE};
use crate::handlers::http::{ApiRequest, ApiResponse};

/// POST /api/auth/logout
///
/// Tokens are stateless, so logging out only clears the cookie; a copy of
/// the token held elsewhere stays valid until it expires.
pub async fn handle_logout(_req: ApiRequest, _state: AppState) -> Result<ApiResponse> {
    info!("User logged out");

    let response_json = serde_json::json!({
        "status": "success",
        "message": "Logged out successfully"
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::SET_COOKIE, utils::delete_cookie(AUTH_COOKIE, true)?)
        .body(utils::full(response_json.to_string()))
        .context("Failed to build logout response")
}
