use std::fs;
use tracing::{debug, error, info};

use crate::types::server_config::{AppConfig, ConfigError, MAX_TOKEN_EXPIRY_MINUTES};

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    info!("Loading configuration from: {}", path);

    let contents = fs::read_to_string(path)?;
    debug!("Processing file: {}", path);

    parse_config(&contents)
}

/// Parse and validate configuration text.
pub fn parse_config(contents: &str) -> Result<AppConfig, ConfigError> {
    if contents.trim().is_empty() {
        error!("Configuration file is empty");
        return Err(ConfigError::InvalidConfig("empty file".into()));
    }

    let config: AppConfig = toml::from_str(contents)?;

    info!("Configuration loaded successfully");

    validate_config(&config)?;

    info!("Config validated");

    Ok(config)
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.bind.is_empty() {
        return Err(ConfigError::InvalidConfig("bind cannot be empty".into()));
    }

    if config.server.request_timeout_secs == 0 {
        return Err(ConfigError::InvalidConfig(
            "request_timeout_secs must be greater than 0".into(),
        ));
    }

    if config.server.max_connections == 0 {
        return Err(ConfigError::InvalidConfig(
            "max_connections must be greater than 0".into(),
        ));
    }

    if config.auth.token_expiry_minutes == 0 {
        return Err(ConfigError::InvalidConfig(
            "token_expiry_minutes must be greater than 0".into(),
        ));
    }

    if config.auth.token_expiry_minutes > MAX_TOKEN_EXPIRY_MINUTES {
        return Err(ConfigError::InvalidConfig(format!(
            "token_expiry_minutes cannot exceed {}",
            MAX_TOKEN_EXPIRY_MINUTES
        )));
    }

    if config.database.url.is_empty() {
        return Err(ConfigError::InvalidConfig("database.url cannot be empty".into()));
    }

    if config.access.bypass_prefixes.is_empty()
        || config.access.bypass_prefixes.iter().any(|p| !p.starts_with('/'))
    {
        return Err(ConfigError::InvalidConfig(
            "access.bypass_prefixes must be non-empty absolute paths".into(),
        ));
    }

    // JWT secret must be resolvable (env var or config field) and long enough.
    match config.auth.resolved_jwt_secret() {
        None => {
            return Err(ConfigError::InvalidConfig(
                "jwt_secret must be set via the JWT_SECRET env var or auth.jwt_secret config field"
                    .into(),
            ));
        }
        Some(secret) if secret.len() < 32 => {
            return Err(ConfigError::InvalidConfig(
                "jwt_secret must be at least 32 characters long".into(),
            ));
        }
        _ => {}
    }

    debug!(
        "Access bypass prefixes: {:?}",
        config.access.bypass_prefixes
    );

    Ok(())
}
