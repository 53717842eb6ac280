//! Account registration, login and identity endpoints

use crate::api::SuccessResponse;
use crate::domain::{AuthTokenResponse, LoginInput, RegisterInput, User};
use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::state::HasServices;
use crate::telemetry::metrics::record_auth_attempt;
use crate::validation::ValidatedJson;
use axum::{extract::State, http::StatusCode, Json};

/// POST /api/auth/register
pub async fn register<S: HasServices>(
    State(state): State<S>,
    ValidatedJson(input): ValidatedJson<RegisterInput>,
) -> Result<(StatusCode, Json<SuccessResponse<AuthTokenResponse>>), AppError> {
    let result = state.auth_service().register(input).await;
    record_auth_attempt("register", result.is_ok());
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(result?))))
}

/// POST /api/auth/login
pub async fn login<S: HasServices>(
    State(state): State<S>,
    ValidatedJson(input): ValidatedJson<LoginInput>,
) -> Result<Json<SuccessResponse<AuthTokenResponse>>, AppError> {
    let result = state.auth_service().login(input).await;
    record_auth_attempt("login", result.is_ok());
    Ok(Json(SuccessResponse::new(result?)))
}

/// GET /api/auth/me
pub async fn me<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
) -> Result<Json<SuccessResponse<User>>, AppError> {
    let user = state.auth_service().me(auth.id()).await?;
    Ok(Json(SuccessResponse::new(user)))
}
