//! Form domain model

use super::id::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Form status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FormStatus {
    #[default]
    Open,
    Closed,
    Scheduled,
}

impl FormStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormStatus::Open => "Open",
            FormStatus::Closed => "Closed",
            FormStatus::Scheduled => "Scheduled",
        }
    }
}

impl std::str::FromStr for FormStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Open" => Ok(FormStatus::Open),
            "Closed" => Ok(FormStatus::Closed),
            "Scheduled" => Ok(FormStatus::Scheduled),
            _ => Err(format!("Unknown form status: {}", s)),
        }
    }
}

impl std::fmt::Display for FormStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl sqlx::Type<sqlx::MySql> for FormStatus {
    fn type_info() -> sqlx::mysql::MySqlTypeInfo {
        <String as sqlx::Type<sqlx::MySql>>::type_info()
    }

    fn compatible(ty: &sqlx::mysql::MySqlTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::MySql>>::compatible(ty)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::MySql> for FormStatus {
    fn decode(
        value: sqlx::mysql::MySqlValueRef<'r>,
    ) -> std::result::Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::MySql>>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl<'q> sqlx::Encode<'q, sqlx::MySql> for FormStatus {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<u8>,
    ) -> std::result::Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::MySql>>::encode_by_ref(&self.as_str(), buf)
    }
}

/// One input definition within a form.
///
/// `conditional` is an opaque visibility rule; it is stored and returned
/// as-is and never evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Field {
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Field type is required"))]
    pub field_type: String,
    #[validate(length(min = 1, message = "Field label is required"))]
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub conditional: Option<serde_json::Value>,
}

/// Form entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: RecordId,
    pub title: String,
    #[sqlx(json)]
    pub fields: Vec<Field>,
    pub status: FormStatus,
    pub scheduled_date: Option<DateTime<Utc>>,
    /// Argon2 hash of the access password, never sent to clients
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub created_by: RecordId,
    pub created_at: DateTime<Utc>,
}

impl Form {
    pub fn is_password_protected(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// Longest title the `forms.title` column holds, in characters
pub const TITLE_MAX_LEN: usize = 500;

fn validate_title_length(title: &str) -> Result<(), validator::ValidationError> {
    if title.chars().count() <= TITLE_MAX_LEN {
        Ok(())
    } else {
        Err(validator::ValidationError::new("title_too_long")
            .with_message("Title must be at most 500 characters".into()))
    }
}

/// Input for creating a form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFormInput {
    #[validate(
        length(min = 1, message = "Title is required"),
        custom(function = "validate_title_length")
    )]
    pub title: String,
    #[validate(nested)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub status: Option<FormStatus>,
    #[serde(default)]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: Option<String>,
}

/// Input for updating a form; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFormInput {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Title is required"),
        custom(function = "validate_title_length")
    )]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub fields: Option<Vec<Field>>,
    #[serde(default)]
    pub status: Option<FormStatus>,
    #[serde(default)]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: Option<String>,
    /// Drop the access password
    #[serde(default)]
    pub remove_password: bool,
}
