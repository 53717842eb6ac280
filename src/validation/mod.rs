//! Declarative request-body rules checked before a handler runs
//!
//! Each endpoint that accepts a body declares a static rule set. Rules are
//! evaluated against the raw JSON object so shape problems are reported as
//! readable messages (one per violated rule) rather than as a
//! deserialization error; only then is the body converted into its typed
//! input.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::domain::{CreateFormInput, CreateResponseInput, LoginInput, RegisterInput, UpdateFormInput};
use crate::error::AppError;

/// What a rule checks about one top-level key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Present, not null, not `""` and not `[]`
    NotEmpty,
    /// A JSON array
    Array,
    /// A JSON object (not an array, scalar or null)
    Object,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub check: Check,
    pub message: &'static str,
    /// When set, an absent key passes
    pub optional: bool,
}

impl FieldRule {
    pub const fn required(field: &'static str, check: Check, message: &'static str) -> Self {
        Self {
            field,
            check,
            message,
            optional: false,
        }
    }

    pub const fn optional(field: &'static str, check: Check, message: &'static str) -> Self {
        Self {
            field,
            check,
            message,
            optional: true,
        }
    }

    fn passes(&self, body: &Map<String, Value>) -> bool {
        let value = match body.get(self.field) {
            Some(value) => value,
            None => return self.optional,
        };

        match self.check {
            Check::NotEmpty => !is_empty(value),
            Check::Array => value.is_array(),
            Check::Object => value.is_object(),
        }
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Evaluate every rule, returning one message per violation in declaration order
pub fn check_rules(rules: &[FieldRule], body: &Map<String, Value>) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| !rule.passes(body))
        .map(|rule| rule.message.to_string())
        .collect()
}

pub const FORM_CREATE_RULES: &[FieldRule] = &[
    FieldRule::required("title", Check::NotEmpty, "Title is required"),
    FieldRule::required("fields", Check::Array, "Fields must be an array"),
];

pub const FORM_UPDATE_RULES: &[FieldRule] = &[
    FieldRule::optional("title", Check::NotEmpty, "Title is required"),
    FieldRule::optional("fields", Check::Array, "Fields must be an array"),
];

pub const RESPONSE_CREATE_RULES: &[FieldRule] = &[
    FieldRule::required("formId", Check::NotEmpty, "Form ID is required"),
    FieldRule::required("responses", Check::Object, "Responses must be an object"),
];

pub const REGISTER_RULES: &[FieldRule] = &[
    FieldRule::required("email", Check::NotEmpty, "Email is required"),
    FieldRule::required("password", Check::NotEmpty, "Password is required"),
];

pub const LOGIN_RULES: &[FieldRule] = REGISTER_RULES;

/// Associates a request input type with the rules its body must satisfy
pub trait RequestRules {
    const RULES: &'static [FieldRule];
}

impl RequestRules for CreateFormInput {
    const RULES: &'static [FieldRule] = FORM_CREATE_RULES;
}

impl RequestRules for UpdateFormInput {
    const RULES: &'static [FieldRule] = FORM_UPDATE_RULES;
}

impl RequestRules for CreateResponseInput {
    const RULES: &'static [FieldRule] = RESPONSE_CREATE_RULES;
}

impl RequestRules for RegisterInput {
    const RULES: &'static [FieldRule] = REGISTER_RULES;
}

impl RequestRules for LoginInput {
    const RULES: &'static [FieldRule] = LOGIN_RULES;
}

/// JSON body extractor that applies `T::RULES` before deserializing into `T`.
///
/// A body that is not JSON, not an object, or that violates a rule is
/// rejected with 400 and the handler never runs.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + RequestRules,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await.map_err(|e| {
            tracing::debug!("Rejected request body: {}", e);
            AppError::BadRequest("Invalid JSON body".to_string())
        })?;

        let body = value
            .as_object()
            .ok_or_else(|| AppError::BadRequest("Request body must be a JSON object".to_string()))?;

        let violations = check_rules(T::RULES, body);
        if !violations.is_empty() {
            return Err(AppError::Validation(violations));
        }

        let input = serde_json::from_value(value)
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))?;
        Ok(ValidatedJson(input))
    }
}
