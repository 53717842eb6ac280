//! Form access and lifecycle policies.
//!
//! Each rule takes the current entity state plus the proposed action and
//! returns an explicit decision. Services call these before touching the
//! store and turn a denial into an error via [`PolicyDecision::into_result`].

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::domain::{Form, FormStatus, RecordId};
use crate::error::AppError;

pub type PolicyResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    Allow,
    Deny(DenyReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    NotOwner,
    PasswordRequired,
    FormClosed,
    NotYetOpen,
    MissingScheduledDate,
    MissingRequiredAnswers(Vec<String>),
}

impl PolicyDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, PolicyDecision::Allow)
    }

    /// Map a denial to the error the API reports for it
    pub fn into_result(self) -> PolicyResult<()> {
        match self {
            PolicyDecision::Allow => Ok(()),
            PolicyDecision::Deny(reason) => Err(reason.into()),
        }
    }
}

impl From<DenyReason> for AppError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::NotOwner => {
                AppError::Forbidden("Only the form owner can perform this action".to_string())
            }
            DenyReason::PasswordRequired => {
                AppError::Forbidden("A valid form password is required".to_string())
            }
            DenyReason::FormClosed => {
                AppError::Forbidden("This form is closed to new responses".to_string())
            }
            DenyReason::NotYetOpen => {
                AppError::Forbidden("This form is not open for responses yet".to_string())
            }
            DenyReason::MissingScheduledDate => AppError::Validation(vec![
                "Scheduled forms require a scheduledDate".to_string(),
            ]),
            DenyReason::MissingRequiredAnswers(labels) => AppError::Validation(
                labels
                    .into_iter()
                    .map(|label| format!("{} is required", label))
                    .collect(),
            ),
        }
    }
}

/// Only the creator may modify a form or see its responses
pub fn check_owner(form: &Form, user_id: RecordId) -> PolicyDecision {
    if form.created_by == user_id {
        PolicyDecision::Allow
    } else {
        PolicyDecision::Deny(DenyReason::NotOwner)
    }
}

/// Password gate for reading and submitting.
///
/// `password_matches` is the result of verifying the supplied password
/// against the stored hash (`false` when none was supplied). The owner
/// always passes.
pub fn check_form_access(
    form: &Form,
    password_matches: bool,
    viewer: Option<RecordId>,
) -> PolicyDecision {
    if !form.is_password_protected() || password_matches {
        return PolicyDecision::Allow;
    }
    match viewer {
        Some(user_id) if user_id == form.created_by => PolicyDecision::Allow,
        _ => PolicyDecision::Deny(DenyReason::PasswordRequired),
    }
}

/// Whether the form accepts submissions at `now`
pub fn check_submission_window(form: &Form, now: DateTime<Utc>) -> PolicyDecision {
    match form.status {
        FormStatus::Open => PolicyDecision::Allow,
        FormStatus::Closed => PolicyDecision::Deny(DenyReason::FormClosed),
        FormStatus::Scheduled => match form.scheduled_date {
            Some(opens_at) if now >= opens_at => PolicyDecision::Allow,
            _ => PolicyDecision::Deny(DenyReason::NotYetOpen),
        },
    }
}

/// Any transition is legal except ending up Scheduled without a date
pub fn check_status_transition(
    _current: FormStatus,
    proposed: FormStatus,
    scheduled_date: Option<DateTime<Utc>>,
) -> PolicyDecision {
    if proposed == FormStatus::Scheduled && scheduled_date.is_none() {
        PolicyDecision::Deny(DenyReason::MissingScheduledDate)
    } else {
        PolicyDecision::Allow
    }
}

/// Every required, unconditional field must have a non-empty answer keyed by its label.
///
/// Fields carrying a `conditional` rule are skipped: their visibility is not evaluated.
pub fn check_required_answers(form: &Form, responses: &Map<String, Value>) -> PolicyDecision {
    let missing: Vec<String> = form
        .fields
        .iter()
        .filter(|field| field.required && field.conditional.is_none())
        .filter(|field| !has_answer(responses.get(&field.label)))
        .map(|field| field.label.clone())
        .collect();

    if missing.is_empty() {
        PolicyDecision::Allow
    } else {
        PolicyDecision::Deny(DenyReason::MissingRequiredAnswers(missing))
    }
}

fn has_answer(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    }
}
