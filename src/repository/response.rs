//! Form response repository

use crate::domain::{FormResponse, RecordId};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResponseRepository: Send + Sync {
    async fn create(&self, response: &FormResponse) -> Result<FormResponse>;
    async fn find_by_id(&self, id: RecordId) -> Result<Option<FormResponse>>;
    async fn list_by_form(&self, form_id: RecordId) -> Result<Vec<FormResponse>>;
    async fn delete(&self, id: RecordId) -> Result<()>;
}

pub struct ResponseRepositoryImpl {
    pool: MySqlPool,
}

impl ResponseRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResponseRepository for ResponseRepositoryImpl {
    async fn create(&self, response: &FormResponse) -> Result<FormResponse> {
        let answers_json =
            serde_json::to_string(&response.responses).map_err(|e| AppError::Internal(e.into()))?;

        sqlx::query(
            r#"
            INSERT INTO form_responses (id, form_id, responses, email, submitted_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(response.id)
        .bind(response.form_id)
        .bind(&answers_json)
        .bind(&response.email)
        .bind(response.submitted_at)
        .execute(&self.pool)
        .await?;

        self.find_by_id(response.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to store response")))
    }

    async fn find_by_id(&self, id: RecordId) -> Result<Option<FormResponse>> {
        let response = sqlx::query_as::<_, FormResponse>(
            r#"
            SELECT id, form_id, responses, email, submitted_at
            FROM form_responses
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(response)
    }

    async fn list_by_form(&self, form_id: RecordId) -> Result<Vec<FormResponse>> {
        let responses = sqlx::query_as::<_, FormResponse>(
            r#"
            SELECT id, form_id, responses, email, submitted_at
            FROM form_responses
            WHERE form_id = ?
            ORDER BY submitted_at DESC
            "#,
        )
        .bind(form_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(responses)
    }

    async fn delete(&self, id: RecordId) -> Result<()> {
        let result = sqlx::query("DELETE FROM form_responses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Response not found".to_string()));
        }

        Ok(())
    }
}
