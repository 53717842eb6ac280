//! Form management endpoints

use crate::api::{form_password, MessageResponse, SuccessResponse};
use crate::domain::{CreateFormInput, Form, FormResponse, RecordId, UpdateFormInput};
use crate::error::AppError;
use crate::middleware::{AuthUser, OptionalAuth};
use crate::state::HasServices;
use crate::telemetry::metrics::record_form_created;
use crate::validation::ValidatedJson;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};

/// List the caller's forms, newest first
pub async fn list<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
) -> Result<Json<SuccessResponse<Vec<Form>>>, AppError> {
    let forms = state.form_service().list_owned(auth.id()).await?;
    Ok(Json(SuccessResponse::new(forms)))
}

pub async fn create<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateFormInput>,
) -> Result<(StatusCode, Json<SuccessResponse<Form>>), AppError> {
    let form = state.form_service().create(auth.id(), input).await?;
    record_form_created();
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(form))))
}

/// Public read. Password-protected forms need `x-form-password` unless the
/// caller owns the form.
pub async fn get<S: HasServices>(
    State(state): State<S>,
    OptionalAuth(auth): OptionalAuth,
    headers: HeaderMap,
    Path(id): Path<RecordId>,
) -> Result<Json<SuccessResponse<Form>>, AppError> {
    let viewer = auth.as_ref().map(AuthUser::id);
    let form = state
        .form_service()
        .get_for_viewer(id, form_password(&headers), viewer)
        .await?;
    Ok(Json(SuccessResponse::new(form)))
}

pub async fn update<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<RecordId>,
    ValidatedJson(input): ValidatedJson<UpdateFormInput>,
) -> Result<Json<SuccessResponse<Form>>, AppError> {
    let form = state.form_service().update(id, auth.id(), input).await?;
    Ok(Json(SuccessResponse::new(form)))
}

pub async fn delete<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<RecordId>,
) -> Result<Json<MessageResponse>, AppError> {
    state.form_service().delete(id, auth.id()).await?;
    Ok(Json(MessageResponse::new("Form deleted successfully")))
}

/// GET /api/forms/{id}/responses (owner only)
pub async fn list_responses<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<RecordId>,
) -> Result<Json<SuccessResponse<Vec<FormResponse>>>, AppError> {
    let responses = state
        .response_service()
        .list_by_form(id, auth.id())
        .await?;
    Ok(Json(SuccessResponse::new(responses)))
}
