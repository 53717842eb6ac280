//! Authenticated identity and the extractors that expose it to handlers
//!
//! Provides:
//! - `AuthUser` extractor for handlers requiring authenticated users
//! - `OptionalAuth` extractor for public handlers that behave differently for the owner
//! - `extract_bearer_token`, shared with the request gate

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::domain::RecordId;
use crate::jwt::{Claims, JwtManager};
use crate::state::HasServices;

/// Message returned when no usable bearer token is present
pub const NO_TOKEN_MESSAGE: &str = "Not authorized, no token";
/// Message returned when a token is present but fails verification
pub const TOKEN_FAILED_MESSAGE: &str = "Not authorized, token failed";

/// Authenticated user information resolved from a verified token
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    /// User ID from the token's `sub` claim
    pub user_id: Uuid,
    /// User's email address
    pub email: String,
    /// The verified claims, exactly as signed
    pub claims: Claims,
}

impl AuthUser {
    /// Create AuthUser from verified claims
    pub fn from_claims(claims: Claims) -> Result<Self, AuthError> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        Ok(Self {
            user_id,
            email: claims.email.clone(),
            claims,
        })
    }

    pub fn id(&self) -> RecordId {
        RecordId::from(self.user_id)
    }

    /// Verify a raw token and resolve the identity it carries
    pub fn from_token(jwt_manager: &JwtManager, token: &str) -> Result<Self, AuthError> {
        let claims = jwt_manager.verify_token(token).map_err(|e| {
            tracing::debug!("Token verification failed: {}", e);
            AuthError::InvalidToken
        })?;
        Self::from_claims(claims)
    }
}

/// Authentication errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No Authorization header, a non-Bearer scheme, or an empty token
    MissingToken,
    /// Token present but signature, issuer, expiry or subject is invalid
    InvalidToken,
}

impl AuthError {
    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => NO_TOKEN_MESSAGE,
            AuthError::InvalidToken => TOKEN_FAILED_MESSAGE,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": "unauthorized",
            "message": self.message(),
        });

        (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
    }
}

/// Extract the bearer token from the Authorization header.
///
/// The scheme prefix is case-sensitive and the token must be non-empty.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MissingToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingToken)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    Ok(token)
}

/// Axum extractor for authenticated users
///
/// Reuses the identity attached by the request gate when present, otherwise
/// verifies the bearer token itself.
impl<S> FromRequestParts<S> for AuthUser
where
    S: HasServices + Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let token = extract_bearer_token(&parts.headers)?;
        AuthUser::from_token(state.jwt_manager(), token)
    }
}

/// Optional authentication extractor
///
/// Returns `Some(AuthUser)` if a valid token is present, `None` otherwise.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: HasServices + Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AuthUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(OptionalAuth(Some(user))),
            Err(_) => Ok(OptionalAuth(None)),
        }
    }
}
