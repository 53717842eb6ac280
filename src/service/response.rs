//! Response submission and retrieval

use crate::domain::{CreateResponseInput, Form, FormResponse, RecordId};
use crate::error::{AppError, Result};
use crate::policy;
use crate::repository::{FormRepository, ResponseRepository};
use crate::service::form::password_matches;
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

pub struct ResponseService<R: ResponseRepository, F: FormRepository> {
    response_repo: Arc<R>,
    form_repo: Arc<F>,
}

impl<R: ResponseRepository, F: FormRepository> ResponseService<R, F> {
    pub fn new(response_repo: Arc<R>, form_repo: Arc<F>) -> Self {
        Self {
            response_repo,
            form_repo,
        }
    }

    async fn find_form(&self, form_id: RecordId) -> Result<Form> {
        self.form_repo
            .find_by_id(form_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Form not found".to_string()))
    }

    async fn find_response(&self, id: RecordId) -> Result<FormResponse> {
        self.response_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Response not found".to_string()))
    }

    /// Record a submission. Anonymous respondents are allowed.
    pub async fn submit(
        &self,
        input: CreateResponseInput,
        supplied_password: Option<&str>,
        viewer: Option<RecordId>,
    ) -> Result<FormResponse> {
        input.validate()?;

        let form = self.find_form(input.form_id).await?;
        let matches = password_matches(&form, supplied_password)?;
        policy::check_form_access(&form, matches, viewer).into_result()?;

        let now = Utc::now();
        policy::check_submission_window(&form, now).into_result()?;
        policy::check_required_answers(&form, &input.responses).into_result()?;

        let response = FormResponse {
            id: RecordId::new_v4(),
            form_id: form.id,
            responses: input.responses,
            email: input.email,
            submitted_at: now,
        };

        let response = self.response_repo.create(&response).await?;
        tracing::info!(form_id = %form.id, response_id = %response.id, "Response submitted");
        Ok(response)
    }

    /// A response is visible to the owner of the form it answers
    pub async fn get(&self, id: RecordId, user_id: RecordId) -> Result<FormResponse> {
        let response = self.find_response(id).await?;
        let form = self.find_form(response.form_id).await?;
        policy::check_owner(&form, user_id).into_result()?;
        Ok(response)
    }

    pub async fn list_by_form(
        &self,
        form_id: RecordId,
        user_id: RecordId,
    ) -> Result<Vec<FormResponse>> {
        let form = self.find_form(form_id).await?;
        policy::check_owner(&form, user_id).into_result()?;
        self.response_repo.list_by_form(form_id).await
    }

    pub async fn delete(&self, id: RecordId, user_id: RecordId) -> Result<()> {
        let response = self.find_response(id).await?;
        let form = self.find_form(response.form_id).await?;
        policy::check_owner(&form, user_id).into_result()?;
        self.response_repo.delete(id).await
    }
}
