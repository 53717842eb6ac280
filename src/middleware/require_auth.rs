//! Request gate for protected routes
//!
//! Validates the Bearer token in the Authorization header, attaches the
//! resolved `AuthUser` to the request extensions, and rejects requests
//! without a valid token before any handler runs.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::auth::{extract_bearer_token, AuthUser};
use crate::jwt::JwtManager;

/// Shared state for authentication middleware
#[derive(Clone)]
pub struct AuthMiddlewareState {
    jwt_manager: JwtManager,
}

impl AuthMiddlewareState {
    pub fn new(jwt_manager: JwtManager) -> Self {
        Self { jwt_manager }
    }
}

/// Authentication enforcement middleware
///
/// - Missing header, non-Bearer scheme or empty token: 401 "no token", verifier not called
/// - Verification failure: 401 "token failed"
/// - Success: `AuthUser` inserted into request extensions
pub async fn require_auth_middleware(
    State(auth_state): State<AuthMiddlewareState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer_token(request.headers()) {
        Ok(token) => token,
        Err(e) => return e.into_response(),
    };

    let user = match AuthUser::from_token(&auth_state.jwt_manager, token) {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    request.extensions_mut().insert(user);
    next.run(request).await
}
