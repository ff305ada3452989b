use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_token_expiry")]
    pub token_expiry_minutes: u64,
    /// HMAC key used to sign and verify JWTs.
    ///
    /// Prefer loading this via the `JWT_SECRET` environment variable.  This
    /// field is the fallback for deployments that cannot inject env vars.
    ///
    /// **Minimum length:** 32 characters.
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AccessConfig {
    /// Path prefixes that skip access-context resolution entirely.
    #[serde(default = "default_bypass_prefixes")]
    pub bypass_prefixes: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub access: AccessConfig,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

impl ServerConfig {
    /// Full bind address, e.g. `"0.0.0.0:5080"`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl AuthConfig {
    /// Token expiry converted to seconds: convenience for cookie `Max-Age`.
    pub fn token_expiry_secs(&self) -> u64 {
        self.token_expiry_minutes.saturating_mul(60)
    }

    /// Resolve the JWT secret with `JWT_SECRET` env-var taking priority over
    /// the config file field.
    pub fn resolved_jwt_secret(&self) -> Option<String> {
        std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.jwt_secret.clone())
            .filter(|s| !s.is_empty())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            bypass_prefixes: default_bypass_prefixes(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde defaults
// ---------------------------------------------------------------------------

pub fn default_port() -> u16 {
    5080
}

pub fn default_request_timeout() -> u64 {
    30
}

pub fn default_max_connections() -> usize {
    1000
}

pub fn default_database_url() -> String {
    "sqlite://itams.db?mode=rwc".to_string()
}

pub fn default_token_expiry() -> u64 {
    60
}

/// Upper bound on `auth.token_expiry_minutes`: 30 days.
pub const MAX_TOKEN_EXPIRY_MINUTES: u64 = 30 * 24 * 60;

pub fn default_bypass_prefixes() -> Vec<String> {
    vec!["/api/auth/".to_string(), "/api/superadmin/login".to_string()]
}
