//! Liveness and readiness probes

use crate::state::HasServices;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

/// Plain-text body of `GET /`
pub const ROOT_BANNER: &str = "Backend server is running";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub database: bool,
}

pub async fn root() -> &'static str {
    ROOT_BANNER
}

/// Process liveness; never touches the database
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// 200 when the database answers, 503 otherwise
pub async fn ready<S: HasServices>(
    State(state): State<S>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let database = state.check_ready().await;
    let (code, status) = if database {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };

    (
        code,
        Json(ReadinessResponse {
            status: status.to_string(),
            database,
        }),
    )
}
