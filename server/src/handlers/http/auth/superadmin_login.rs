use anyhow::Result;

use super::login::{LoginKind, process_login};
use crate::AppState;
use crate::handlers::http::{ApiRequest, ApiResponse};

/// POST /api/superadmin/login
///
/// Same credential check as the regular login, restricted to accounts whose
/// role carries the super-admin flag.
pub async fn handle_login(req: ApiRequest, state: AppState) -> Result<ApiResponse> {
    process_login(req, state, LoginKind::SuperAdmin).await
}
