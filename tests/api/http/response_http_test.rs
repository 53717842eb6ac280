//! Response API HTTP Handler Tests

use super::{build_test_router, delete_json, get_json, post_json, send_json, TestAppState};
use crate::api::{create_test_form, create_test_identity};
use formhub_core::api::{MessageResponse, SuccessResponse};
use formhub_core::crypto::hash_password;
use formhub_core::domain::{FormResponse, FormStatus, RecordId};
use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};

fn answers(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

fn stored_response(form_id: RecordId) -> FormResponse {
    FormResponse {
        id: RecordId::new_v4(),
        form_id,
        responses: answers(json!({"Name": "Alice"})),
        email: None,
        submitted_at: Utc::now(),
    }
}

// ============================================================================
// Submit
// ============================================================================

#[tokio::test]
async fn test_anonymous_submission_is_accepted() {
    let state = TestAppState::new();
    let (owner, _) = create_test_identity();
    let form = create_test_form(owner);
    let form_id = form.id;
    state.form_repo.add_form(form).await;
    let response_repo = state.response_repo.clone();
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<FormResponse>>) = post_json(
        &app,
        "/api/responses",
        None,
        &json!({
            "formId": form_id.to_string(),
            "responses": {"Name": "Alice", "Comments": "Great"},
            "email": "alice@example.com"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let response = body.unwrap().data;
    assert_eq!(response.form_id, form_id);
    assert_eq!(response.responses["Name"], "Alice");
    assert_eq!(response.email.as_deref(), Some("alice@example.com"));
    assert_eq!(response_repo.count().await, 1);
}

#[tokio::test]
async fn test_submission_with_array_responses_is_rejected() {
    let state = TestAppState::new();
    let (owner, _) = create_test_identity();
    let form = create_test_form(owner);
    let form_id = form.id;
    state.form_repo.add_form(form).await;
    let response_repo = state.response_repo.clone();
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/responses",
        None,
        &json!({"formId": form_id.to_string(), "responses": ["Alice"]}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["errors"], json!(["Responses must be an object"]));
    assert_eq!(response_repo.count().await, 0);
}

#[tokio::test]
async fn test_submission_without_form_id_is_rejected() {
    let state = TestAppState::new();
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/responses",
        None,
        &json!({"responses": {"Name": "Alice"}}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["errors"], json!(["Form ID is required"]));
}

#[tokio::test]
async fn test_submission_to_unknown_form_returns_404() {
    let state = TestAppState::new();
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/responses",
        None,
        &json!({"formId": uuid::Uuid::new_v4().to_string(), "responses": {"Name": "A"}}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_required_answer_is_rejected() {
    let state = TestAppState::new();
    let (owner, _) = create_test_identity();
    let form = create_test_form(owner);
    let form_id = form.id;
    state.form_repo.add_form(form).await;
    let response_repo = state.response_repo.clone();
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/responses",
        None,
        &json!({"formId": form_id.to_string(), "responses": {"Name": "   ", "Comments": "hi"}}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["errors"], json!(["Name is required"]));
    assert_eq!(response_repo.count().await, 0);
}

#[tokio::test]
async fn test_closed_form_rejects_submissions() {
    let state = TestAppState::new();
    let (owner, _) = create_test_identity();
    let mut form = create_test_form(owner);
    form.status = FormStatus::Closed;
    let form_id = form.id;
    state.form_repo.add_form(form).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/responses",
        None,
        &json!({"formId": form_id.to_string(), "responses": {"Name": "Alice"}}),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body.unwrap()["message"], "This form is closed to new responses");
}

#[tokio::test]
async fn test_scheduled_form_opens_at_its_date() {
    let state = TestAppState::new();
    let (owner, _) = create_test_identity();

    let mut future = create_test_form(owner);
    future.status = FormStatus::Scheduled;
    future.scheduled_date = Some(Utc::now() + Duration::hours(1));
    let future_id = future.id;

    let mut past = create_test_form(owner);
    past.status = FormStatus::Scheduled;
    past.scheduled_date = Some(Utc::now() - Duration::hours(1));
    let past_id = past.id;

    state.form_repo.add_form(future).await;
    state.form_repo.add_form(past).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/responses",
        None,
        &json!({"formId": future_id.to_string(), "responses": {"Name": "Alice"}}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/responses",
        None,
        &json!({"formId": past_id.to_string(), "responses": {"Name": "Alice"}}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_protected_form_requires_password_to_submit() {
    let state = TestAppState::new();
    let (owner, owner_token) = create_test_identity();
    let mut form = create_test_form(owner);
    form.password_hash = Some(hash_password("open-sesame").unwrap());
    let form_id = form.id;
    state.form_repo.add_form(form).await;
    let app = build_test_router(state);

    let body = json!({"formId": form_id.to_string(), "responses": {"Name": "Alice"}}).to_string();

    let (status, _): (StatusCode, Option<Value>) = send_json(
        &app,
        Method::POST,
        "/api/responses",
        None,
        &[],
        Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _): (StatusCode, Option<Value>) = send_json(
        &app,
        Method::POST,
        "/api/responses",
        None,
        &[("x-form-password", "wrong")],
        Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _): (StatusCode, Option<Value>) = send_json(
        &app,
        Method::POST,
        "/api/responses",
        None,
        &[("x-form-password", "open-sesame")],
        Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // The owner bypasses the gate
    let (status, _): (StatusCode, Option<Value>) = send_json(
        &app,
        Method::POST,
        "/api/responses",
        Some(&owner_token),
        &[],
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

// ============================================================================
// Owner access
// ============================================================================

#[tokio::test]
async fn test_owner_lists_responses_for_form() {
    let state = TestAppState::new();
    let (owner, token) = create_test_identity();
    let form = create_test_form(owner);
    let form_id = form.id;
    state.form_repo.add_form(form).await;
    state.response_repo.add_response(stored_response(form_id)).await;
    state.response_repo.add_response(stored_response(form_id)).await;
    state
        .response_repo
        .add_response(stored_response(RecordId::new_v4()))
        .await;
    let app = build_test_router(state);

    let path = format!("/api/forms/{}/responses", form_id);
    let (status, body): (StatusCode, Option<SuccessResponse<Vec<FormResponse>>>) =
        get_json(&app, &path, Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let responses = body.unwrap().data;
    assert_eq!(responses.len(), 2);
    assert!(responses.iter().all(|r| r.form_id == form_id));
}

#[tokio::test]
async fn test_non_owner_cannot_read_responses() {
    let state = TestAppState::new();
    let (owner, _) = create_test_identity();
    let (_, intruder_token) = create_test_identity();
    let form = create_test_form(owner);
    let form_id = form.id;
    let response = stored_response(form_id);
    let response_id = response.id;
    state.form_repo.add_form(form).await;
    state.response_repo.add_response(response).await;
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = get_json(
        &app,
        &format!("/api/forms/{}/responses", form_id),
        Some(&intruder_token),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _): (StatusCode, Option<Value>) = get_json(
        &app,
        &format!("/api/responses/{}", response_id),
        Some(&intruder_token),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_owner_gets_and_deletes_response() {
    let state = TestAppState::new();
    let (owner, token) = create_test_identity();
    let form = create_test_form(owner);
    let response = stored_response(form.id);
    let response_id = response.id;
    state.form_repo.add_form(form).await;
    state.response_repo.add_response(response).await;
    let response_repo = state.response_repo.clone();
    let app = build_test_router(state);
    let path = format!("/api/responses/{}", response_id);

    let (status, body): (StatusCode, Option<SuccessResponse<FormResponse>>) =
        get_json(&app, &path, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().data.id, response_id);

    let (status, body): (StatusCode, Option<MessageResponse>) =
        delete_json(&app, &path, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap().message, "Response deleted successfully");
    assert_eq!(response_repo.count().await, 0);
}

#[tokio::test]
async fn test_response_of_deleted_form_is_not_found() {
    let state = TestAppState::new();
    let (_, token) = create_test_identity();
    let response = stored_response(RecordId::new_v4());
    let path = format!("/api/responses/{}", response.id);
    state.response_repo.add_response(response).await;
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) = get_json(&app, &path, Some(&token)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap()["message"], "Form not found");
}
