use serde::{Deserialize, Serialize};

/// Body of every JSON error the API returns:
/// `{"status":"error","code":"...","message":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default = "error_status")]
    pub status: String,
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: error_status(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// 401 and 403 style codes.  `client::AuthSession::observe_error_json`
    /// signs out on these.
    pub fn is_access_denied(&self) -> bool {
        matches!(self.code.as_str(), "UNAUTHORIZED" | "FORBIDDEN")
    }
}

fn error_status() -> String {
    "error".to_string()
}
