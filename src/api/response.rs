//! Response submission endpoints

use crate::api::{form_password, MessageResponse, SuccessResponse};
use crate::domain::{CreateResponseInput, FormResponse, RecordId};
use crate::error::AppError;
use crate::middleware::{AuthUser, OptionalAuth};
use crate::state::HasServices;
use crate::telemetry::metrics::record_response_submitted;
use crate::validation::ValidatedJson;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};

/// POST /api/responses
///
/// Open to anonymous respondents. A bearer token, when present and valid,
/// lets the form owner bypass the password gate.
pub async fn create<S: HasServices>(
    State(state): State<S>,
    OptionalAuth(auth): OptionalAuth,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateResponseInput>,
) -> Result<(StatusCode, Json<SuccessResponse<FormResponse>>), AppError> {
    let viewer = auth.as_ref().map(AuthUser::id);
    let response = state
        .response_service()
        .submit(input, form_password(&headers), viewer)
        .await?;
    record_response_submitted();
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(response))))
}

pub async fn get<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<RecordId>,
) -> Result<Json<SuccessResponse<FormResponse>>, AppError> {
    let response = state.response_service().get(id, auth.id()).await?;
    Ok(Json(SuccessResponse::new(response)))
}

pub async fn delete<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<RecordId>,
) -> Result<Json<MessageResponse>, AppError> {
    state.response_service().delete(id, auth.id()).await?;
    Ok(Json(MessageResponse::new("Response deleted successfully")))
}
