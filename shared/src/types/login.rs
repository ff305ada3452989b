use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Login wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginData {
    #[serde(alias = "email")]
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// Successful / failed login response envelope.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoginResponse {
    Success {
        user_id: i64,
        username: String,
        /// Signed JWT string: also set as the `auth_id` cookie.
        token: String,
        expires_in: u64,
        is_super_admin: bool,
        redirect: String,
    },
    Error {
        code: String,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Login errors
// ---------------------------------------------------------------------------

/// Why a login attempt was refused.  `Display` is the message shown to the
/// caller; [`LoginError::to_code`] is the stable machine-readable code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("This account has been deactivated")]
    UserInactive,

    #[error("Super-admin privileges required")]
    NotSuperAdmin,

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Malformed login request")]
    InvalidRequest,

    #[error("Database error occurred")]
    DatabaseError,

    #[error("An internal error occurred")]
    InternalError,
}

impl LoginError {
    pub fn to_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::UserInactive => "USER_INACTIVE",
            Self::NotSuperAdmin => "NOT_SUPER_ADMIN",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Refusals caused by the account itself rather than by the request or
    /// the server.
    pub fn is_account_refusal(&self) -> bool {
        matches!(self, Self::UserInactive | Self::NotSuperAdmin)
    }

    pub fn to_response(&self) -> LoginResponse {
        LoginResponse::Error {
            code: self.to_code().to_string(),
            message: self.to_string(),
        }
    }
}
