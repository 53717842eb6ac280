//! REST API handlers and shared response types

pub mod auth;
pub mod form;
pub mod health;
pub mod metrics;
pub mod response;

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

/// Header carrying the access password of a protected form
pub const FORM_PASSWORD_HEADER: &str = "x-form-password";

/// Standard success envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Message response (for delete, etc.)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The form password supplied with the request, if any
pub(crate) fn form_password(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(FORM_PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}
