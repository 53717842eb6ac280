//! Uniform JSON error bodies and the terminal panic handler
//!
//! Framework rejections (unknown route, wrong method, body parse failures)
//! come out of axum as `text/plain`. They are rewritten here into the same
//! `{error, message}` shape `AppError` produces, so clients only ever see
//! one error format.

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::any::Any;

const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Rewrites non-JSON 4xx/5xx responses into `{error, message}`.
pub async fn normalize_error_response(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) || is_json(response.headers()) {
        return response;
    }

    let (error, message) = describe(status);
    (status, Json(json!({ "error": error, "message": message }))).into_response()
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// Error code and client-facing message for a bare status
fn describe(status: StatusCode) -> (&'static str, &'static str) {
    match status {
        StatusCode::BAD_REQUEST => ("bad_request", "Bad request"),
        StatusCode::UNAUTHORIZED => ("unauthorized", "Not authorized, no token"),
        StatusCode::FORBIDDEN => ("forbidden", "Access denied"),
        StatusCode::NOT_FOUND => ("not_found", "Not found"),
        StatusCode::METHOD_NOT_ALLOWED => ("method_not_allowed", "Method not allowed"),
        StatusCode::PAYLOAD_TOO_LARGE => ("payload_too_large", "Payload too large"),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => ("unsupported_media_type", "Unsupported content type"),
        s if s.is_client_error() => ("client_error", "Client error"),
        _ => ("internal_error", INTERNAL_ERROR_MESSAGE),
    }
}

/// Terminal handler for panics escaping any stage of the pipeline.
///
/// Installed through `CatchPanicLayer::custom`. The payload goes to the log,
/// never to the client.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");

    tracing::error!(panic = %detail, "Request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal_error", "message": INTERNAL_ERROR_MESSAGE })),
    )
        .into_response()
}
