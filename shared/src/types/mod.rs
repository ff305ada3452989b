pub mod access;
pub mod error_body;
pub mod jwt;
pub mod login;
pub mod server_config;

pub use self::access::{AccessContext, SessionView};
pub use self::error_body::ErrorBody;
pub use self::jwt::JwtClaims;
pub use self::login::{LoginData, LoginError, LoginResponse};
