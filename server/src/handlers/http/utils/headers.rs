use anyhow::{Result, anyhow};
use hyper::header::{HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::debug;

/// Name of the cookie carrying the session JWT.
pub const AUTH_COOKIE: &str = "auth_id";

/// Extract a header value as a string
pub fn get_header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// Extract cookie value by name
pub fn get_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all("cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            let name = parts.next()?.trim();
            let value = parts.next()?.trim();
            (name == cookie_name && !value.is_empty()).then(|| value.to_string())
        })
}

/// Set a cookie with options
pub fn set_cookie(
    name: &str,
    value: &str,
    max_age: Option<Duration>,
    path: Option<&str>,
    http_only: bool,
    secure: bool,
) -> Result<HeaderValue> {
    let mut cookie = format!("{}={}", name, value);

    if let Some(age) = max_age {
        cookie.push_str(&format!("; Max-Age={}", age.as_secs()));
    }

    if let Some(p) = path {
        cookie.push_str(&format!("; Path={}", p));
    }

    if http_only {
        cookie.push_str("; HttpOnly");
    }

    if secure {
        cookie.push_str("; Secure");
    }

    cookie.push_str("; SameSite=Strict");

    HeaderValue::from_str(&cookie).map_err(|e| anyhow!("Invalid cookie value for {}: {}", name, e))
}

/// Create a session cookie (expires when browser closes)
pub fn create_session_cookie(name: &str, value: &str, secure: bool) -> Result<HeaderValue> {
    set_cookie(name, value, None, Some("/"), true, secure)
}

/// Create a persistent cookie with expiration
pub fn create_persistent_cookie(
    name: &str,
    value: &str,
    max_age: Duration,
    secure: bool,
) -> Result<HeaderValue> {
    set_cookie(name, value, Some(max_age), Some("/"), true, secure)
}

/// Delete a cookie by setting it to expire.  `secure` must match the flag
/// the cookie was set with.
pub fn delete_cookie(name: &str, secure: bool) -> Result<HeaderValue> {
    set_cookie(name, "", Some(Duration::from_secs(0)), Some("/"), true, secure)
}

/// Extract bearer token from Authorization header
/// Format: "Authorization: Bearer <token>"
pub fn get_bearer_token(headers: &HeaderMap) -> Option<String> {
    get_header_value(headers, "authorization").and_then(|auth| {
        auth.strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    })
}

/// Extract session token from either Bearer header OR auth_id cookie.
/// The header wins when both are present.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = get_bearer_token(headers) {
        debug!("Using session token from Bearer header");
        return Some(token);
    }

    if let Some(token) = get_cookie(headers, AUTH_COOKIE) {
        debug!("Using session token from {} cookie", AUTH_COOKIE);
        return Some(token);
    }

    None
}
