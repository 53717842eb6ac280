//! Form response domain model

use super::id::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use validator::Validate;

/// One respondent's answers to a form, keyed by field label
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    pub id: RecordId,
    pub form_id: RecordId,
    #[sqlx(json)]
    pub responses: Map<String, Value>,
    pub email: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Input for submitting a response
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponseInput {
    pub form_id: RecordId,
    pub responses: Map<String, Value>,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub email: Option<String>,
}
