use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use http_body_util::BodyExt;
use hyper::{Response, StatusCode, header};
use serde::Deserialize;
use tracing::{error, info, warn};

use shared::policy::Role;
use shared::types::{LoginData, LoginError, LoginResponse};

use crate::AppState;
use crate::database::{self, UserAuth};
use crate::handlers::http::utils::{self, AUTH_COOKIE, deliver_serialized_json};
use crate::handlers::http::{ApiRequest, ApiResponse};

/// Which login endpoint is being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginKind {
    /// `/api/auth/login`: any active account.
    User,
    /// `/api/superadmin/login`: only accounts whose role is super-admin.
    SuperAdmin,
}

/// POST /api/auth/login
pub async fn handle_login(req: ApiRequest, state: AppState) -> Result<ApiResponse> {
    process_login(req, state, LoginKind::User).await
}

/// Shared body of both login endpoints.
pub async fn process_login(req: ApiRequest, state: AppState, kind: LoginKind) -> Result<ApiResponse> {
    info!("Processing {:?} login request", kind);

    let login_data = match parse_login(req).await {
        Ok(data) => data,
        Err(e) => {
            warn!("Login parsing failed: {}", e.to_code());
            return deliver_serialized_json(&e.to_response(), status_for(&e));
        }
    };

    if let Err(e) = validate_login(&login_data) {
        warn!("Login validation failed: {}", e.to_code());
        return deliver_serialized_json(&e.to_response(), status_for(&e));
    }

    let (user, token) = match attempt_login(&login_data, &state, kind).await {
        Ok(ok) => ok,
        Err(e) => {
            warn!("Login failed for {}: {}", login_data.username, e.to_code());
            return deliver_serialized_json(&e.to_response(), status_for(&e));
        }
    };

    let token_expiry_secs = state.config.auth.token_expiry_secs();

    // The token goes both into the cookie and the JSON body so the browser
    // client can also send it as a Bearer header.
    let cookie = if login_data.remember_me {
        utils::create_persistent_cookie(
            AUTH_COOKIE,
            &token,
            Duration::from_secs(token_expiry_secs),
            true,
        )
        .context("Failed to create persistent cookie")?
    } else {
        utils::create_session_cookie(AUTH_COOKIE, &token, true)
            .context("Failed to create session cookie")?
    };

    let role = Role::from_super_admin(user.is_super_admin);
    let body = LoginResponse::Success {
        user_id: user.id,
        username: user.username.clone(),
        token,
        expires_in: token_expiry_secs,
        is_super_admin: user.is_super_admin,
        redirect: role.home_route().to_string(),
    };

    let json = serde_json::to_string(&body).context("Failed to serialize login response")?;

    info!("User logged in successfully: {} (ID: {})", user.username, user.id);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::SET_COOKIE, cookie)
        .body(utils::full(json))
        .context("Failed to build login response")
}

fn status_for(e: &LoginError) -> StatusCode {
    match e {
        _ if e.is_account_refusal() => StatusCode::FORBIDDEN,
        LoginError::MissingField(_) | LoginError::InvalidRequest => StatusCode::BAD_REQUEST,
        LoginError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// JSON login body with every field optional, so a missing one can be named.
#[derive(Deserialize)]
struct JsonLogin {
    #[serde(alias = "email")]
    username: Option<String>,
    password: Option<String>,
    #[serde(default)]
    remember_me: bool,
}

/// Parse login data from a JSON or form-encoded body.
async fn parse_login(req: ApiRequest) -> std::result::Result<LoginData, LoginError> {
    let is_json = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);

    let body = req
        .into_body()
        .collect()
        .await
        .map_err(|e| {
            error!("Failed to read login body: {}", e);
            LoginError::InternalError
        })?
        .to_bytes();

    if is_json {
        let raw = serde_json::from_slice::<JsonLogin>(&body).map_err(|e| {
            warn!("Failed to parse login JSON: {}", e);
            LoginError::InvalidRequest
        })?;
        return Ok(LoginData {
            username: raw.username.ok_or(LoginError::MissingField("username".to_string()))?,
            password: raw.password.ok_or(LoginError::MissingField("password".to_string()))?,
            remember_me: raw.remember_me,
        });
    }

    let params = form_urlencoded::parse(body.as_ref())
        .into_owned()
        .collect::<HashMap<String, String>>();

    let username = params
        .get("username")
        .or_else(|| params.get("email"))
        .ok_or(LoginError::MissingField("username".to_string()))?
        .trim()
        .to_string();

    let password = params
        .get("password")
        .ok_or(LoginError::MissingField("password".to_string()))?
        .to_string();

    let remember_me = params
        .get("remember_me")
        .map(|v| v == "on" || v == "true" || v == "1")
        .unwrap_or(false);

    Ok(LoginData {
        username,
        password,
        remember_me,
    })
}

/// Validate login data
fn validate_login(data: &LoginData) -> std::result::Result<(), LoginError> {
    if data.username.trim().is_empty() {
        return Err(LoginError::MissingField("username".to_string()));
    }
    if data.password.is_empty() {
        return Err(LoginError::MissingField("password".to_string()));
    }
    Ok(())
}

/// Check credentials and mint a token.
async fn attempt_login(
    data: &LoginData,
    state: &AppState,
    kind: LoginKind,
) -> std::result::Result<(UserAuth, String), LoginError> {
    let username = data.username.trim();

    let user = database::get_user_auth(&state.db, username)
        .await
        .map_err(|e| {
            error!("Database error getting user auth: {:#}", e);
            LoginError::DatabaseError
        })?
        .ok_or(LoginError::InvalidCredentials)?;

    let password_valid = database::verify_password(&user.password_hash, &data.password).map_err(|e| {
        error!("Password verification error: {:#}", e);
        LoginError::InternalError
    })?;

    if !password_valid {
        return Err(LoginError::InvalidCredentials);
    }

    if !user.is_active {
        return Err(LoginError::UserInactive);
    }

    if kind == LoginKind::SuperAdmin && !user.is_super_admin {
        return Err(LoginError::NotSuperAdmin);
    }

    if let Err(e) = database::update_last_login(&state.db, user.id).await {
        warn!("Failed to update last login for {}: {:#}", user.username, e);
    }

    let ttl = state.config.auth.token_expiry_secs();
    let token = state
        .tokens
        .issue(&user.username, user.id, user.role_id, ttl)
        .map_err(|e| {
            error!("Failed to issue token: {:#}", e);
            LoginError::InternalError
        })?;

    Ok((user, token))
}
