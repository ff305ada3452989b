use anyhow::{Context, Result, anyhow};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Response, StatusCode, header};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, warn};

use shared::types::ErrorBody;

use crate::handlers::http::ApiResponse;

/// Wrap bytes in a boxed, infallible body.
pub fn full<T: Into<Bytes>>(chunk: T) -> http_body_util::combinators::BoxBody<Bytes, std::convert::Infallible> {
    Full::new(chunk.into()).boxed()
}

/// Serialize any `Serialize` type and deliver it as a JSON response.
/// This is the primary helper all handlers should use instead of
/// writing their own one-off serialization + response-building blocks.
pub fn deliver_serialized_json<T: Serialize>(data: &T, status: StatusCode) -> Result<ApiResponse> {
    let json = serde_json::to_string(data).context("Failed to serialize response")?;

    debug!("Delivering serialized JSON response, size: {} bytes", json.len());

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(full(json))
        .map_err(|e| anyhow!("Failed to build JSON response: {}", e))
}

/// Delivers a JSON error response with the specified error code, message, and status.
pub fn deliver_error_json(error_code: &str, message: &str, status: StatusCode) -> Result<ApiResponse> {
    if status.is_server_error() {
        error!("Delivering error JSON: {} - {} ({})", status.as_u16(), error_code, message);
    } else {
        warn!("Delivering error JSON: {} - {} ({})", status.as_u16(), error_code, message);
    }

    let body = serde_json::to_string(&ErrorBody::new(error_code, message))
        .context("Failed to serialize error body")?;

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(full(body))
        .map_err(|e: http::Error| anyhow!("Failed to build error JSON response: {}", e))
}

/// Delivers a success JSON response with optional data.
pub fn deliver_success_json<T: Serialize>(data: Option<T>) -> Result<ApiResponse> {
    let response_body = match data {
        Some(d) => json!({
            "status": "success",
            "data": d
        }),
        None => json!({
            "status": "success"
        }),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(full(response_body.to_string()))
        .map_err(|e: http::Error| anyhow!("Failed to build success JSON response: {}", e))
}

/// Last-resort 500 for when building a JSON error itself failed.
pub fn internal_error() -> ApiResponse {
    deliver_error_json(
        "INTERNAL_ERROR",
        "An internal error occurred",
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .unwrap_or_else(|_| {
        let mut res = Response::new(full(Bytes::new()));
        *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        res
    })
}
