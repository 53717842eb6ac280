//! HTTP middleware for FormHub Core
//!
//! - Request gate (bearer token enforcement) and the `AuthUser` extractor
//! - Error response normalization and the terminal panic handler
//! - Request ID propagation, metrics and sanitized trace spans

pub mod auth;
pub mod error_response;
pub mod metrics;
pub mod require_auth;
pub mod trace;

pub use auth::{AuthUser, OptionalAuth};
pub use error_response::{handle_panic, normalize_error_response};
pub use require_auth::{require_auth_middleware, AuthMiddlewareState};
