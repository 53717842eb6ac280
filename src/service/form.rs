//! Form business logic

use crate::crypto::{hash_password, verify_password};
use crate::domain::{CreateFormInput, Form, FormStatus, RecordId, UpdateFormInput};
use crate::error::{AppError, Result};
use crate::policy;
use crate::repository::FormRepository;
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

pub struct FormService<F: FormRepository> {
    form_repo: Arc<F>,
}

impl<F: FormRepository> FormService<F> {
    pub fn new(form_repo: Arc<F>) -> Self {
        Self { form_repo }
    }

    pub async fn create(&self, owner: RecordId, input: CreateFormInput) -> Result<Form> {
        input.validate()?;

        let status = input.status.unwrap_or_default();
        policy::check_status_transition(FormStatus::Open, status, input.scheduled_date)
            .into_result()?;

        let password_hash = input.password.as_deref().map(hash_password).transpose()?;

        let form = Form {
            id: RecordId::new_v4(),
            title: input.title,
            fields: input.fields,
            status,
            scheduled_date: input.scheduled_date,
            password_hash,
            created_by: owner,
            created_at: Utc::now(),
        };

        let form = self.form_repo.create(&form).await?;
        tracing::info!(form_id = %form.id, owner = %owner, "Form created");
        Ok(form)
    }

    pub async fn get(&self, id: RecordId) -> Result<Form> {
        self.form_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Form not found".to_string()))
    }

    /// Fetch a form for display, applying the password gate
    pub async fn get_for_viewer(
        &self,
        id: RecordId,
        supplied_password: Option<&str>,
        viewer: Option<RecordId>,
    ) -> Result<Form> {
        let form = self.get(id).await?;
        let matches = password_matches(&form, supplied_password)?;
        policy::check_form_access(&form, matches, viewer).into_result()?;
        Ok(form)
    }

    pub async fn list_owned(&self, owner: RecordId) -> Result<Vec<Form>> {
        self.form_repo.list_by_owner(owner).await
    }

    pub async fn update(
        &self,
        id: RecordId,
        user_id: RecordId,
        input: UpdateFormInput,
    ) -> Result<Form> {
        input.validate()?;

        let mut form = self.get(id).await?;
        policy::check_owner(&form, user_id).into_result()?;

        let current_status = form.status;
        if let Some(title) = input.title {
            form.title = title;
        }
        if let Some(fields) = input.fields {
            form.fields = fields;
        }
        if let Some(status) = input.status {
            form.status = status;
        }
        if input.scheduled_date.is_some() {
            form.scheduled_date = input.scheduled_date;
        }
        policy::check_status_transition(current_status, form.status, form.scheduled_date)
            .into_result()?;

        if let Some(password) = input.password.as_deref() {
            form.password_hash = Some(hash_password(password)?);
        } else if input.remove_password {
            form.password_hash = None;
        }

        self.form_repo.update(&form).await
    }

    pub async fn delete(&self, id: RecordId, user_id: RecordId) -> Result<()> {
        let form = self.get(id).await?;
        policy::check_owner(&form, user_id).into_result()?;

        // Responses are kept; their formId may dangle afterwards
        self.form_repo.delete(id).await?;
        tracing::info!(form_id = %id, "Form deleted");
        Ok(())
    }
}

/// Whether `supplied` matches the form's access password (`false` if none was supplied)
pub(crate) fn password_matches(form: &Form, supplied: Option<&str>) -> Result<bool> {
    match (form.password_hash.as_deref(), supplied) {
        (Some(hash), Some(password)) => verify_password(password, hash),
        _ => Ok(false),
    }
}
