//! Auth API HTTP Handler Tests

use super::{build_test_router, get_json, post_json, TestAppState};
use formhub_core::api::SuccessResponse;
use formhub_core::domain::{AuthTokenResponse, User};
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[tokio::test]
async fn test_register_then_me() {
    let state = TestAppState::new();
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<SuccessResponse<AuthTokenResponse>>) = post_json(
        &app,
        "/api/auth/register",
        None,
        &json!({"email": "Alice@Example.com", "password": "secret1", "name": "Alice"}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let issued = body.unwrap().data;
    assert_eq!(issued.token_type, "Bearer");
    assert_eq!(issued.user.email, "alice@example.com");

    let (status, body): (StatusCode, Option<SuccessResponse<User>>) =
        get_json(&app, "/api/auth/me", Some(&issued.token)).await;

    assert_eq!(status, StatusCode::OK);
    let me = body.unwrap().data;
    assert_eq!(me.id, issued.user.id);
    assert_eq!(me.name.as_deref(), Some("Alice"));
}

#[tokio::test]
async fn test_register_never_returns_password_hash() {
    let state = TestAppState::new();
    let app = build_test_router(state);

    let (_, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/auth/register",
        None,
        &json!({"email": "bob@example.com", "password": "secret1"}),
    )
    .await;

    let user = &body.unwrap()["data"]["user"];
    assert!(user.get("passwordHash").is_none());
    assert!(user.get("password").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let state = TestAppState::new();
    let app = build_test_router(state);
    let body = json!({"email": "carol@example.com", "password": "secret1"});

    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/api/auth/register", None, &body).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _): (StatusCode, Option<Value>) =
        post_json(&app, "/api/auth/register", None, &body).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_requires_email_and_password() {
    let state = TestAppState::new();
    let app = build_test_router(state);

    let (status, body): (StatusCode, Option<Value>) =
        post_json(&app, "/api/auth/register", None, &json!({"name": "Nobody"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body.unwrap()["errors"],
        json!(["Email is required", "Password is required"])
    );
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let state = TestAppState::new();
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/auth/register",
        None,
        &json!({"email": "dave@example.com", "password": "123"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_success_and_failure() {
    let state = TestAppState::new();
    let app = build_test_router(state);

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/auth/register",
        None,
        &json!({"email": "erin@example.com", "password": "secret1"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body): (StatusCode, Option<SuccessResponse<AuthTokenResponse>>) = post_json(
        &app,
        "/api/auth/login",
        None,
        &json!({"email": "erin@example.com", "password": "secret1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.unwrap().data.token.is_empty());

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/auth/login",
        None,
        &json!({"email": "erin@example.com", "password": "wrong-one"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body.unwrap()["message"], "Invalid email or password");

    let (status, _): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/auth/login",
        None,
        &json!({"email": "nobody@example.com", "password": "secret1"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_issued_token_opens_protected_routes() {
    let state = TestAppState::new();
    let app = build_test_router(state);

    let (_, body): (StatusCode, Option<SuccessResponse<AuthTokenResponse>>) = post_json(
        &app,
        "/api/auth/register",
        None,
        &json!({"email": "frank@example.com", "password": "secret1"}),
    )
    .await;
    let token = body.unwrap().data.token;

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/forms",
        Some(&token),
        &json!({"title": "Frank's form", "fields": []}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.unwrap()["data"]["title"], "Frank's form");
}
