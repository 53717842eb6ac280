//! Form repository

use crate::domain::{Form, RecordId};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormRepository: Send + Sync {
    async fn create(&self, form: &Form) -> Result<Form>;
    async fn find_by_id(&self, id: RecordId) -> Result<Option<Form>>;
    async fn list_by_owner(&self, owner_id: RecordId) -> Result<Vec<Form>>;
    async fn update(&self, form: &Form) -> Result<Form>;
    async fn delete(&self, id: RecordId) -> Result<()>;
}

pub struct FormRepositoryImpl {
    pool: MySqlPool,
}

impl FormRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FormRepository for FormRepositoryImpl {
    async fn create(&self, form: &Form) -> Result<Form> {
        let fields_json =
            serde_json::to_string(&form.fields).map_err(|e| AppError::Internal(e.into()))?;

        sqlx::query(
            r#"
            INSERT INTO forms (id, title, fields, status, scheduled_date, password_hash,
                               created_by, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(form.id)
        .bind(&form.title)
        .bind(&fields_json)
        .bind(form.status)
        .bind(form.scheduled_date)
        .bind(&form.password_hash)
        .bind(form.created_by)
        .bind(form.created_at)
        .execute(&self.pool)
        .await?;

        self.find_by_id(form.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create form")))
    }

    async fn find_by_id(&self, id: RecordId) -> Result<Option<Form>> {
        let form = sqlx::query_as::<_, Form>(
            r#"
            SELECT id, title, fields, status, scheduled_date, password_hash,
                   created_by, created_at
            FROM forms
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(form)
    }

    async fn list_by_owner(&self, owner_id: RecordId) -> Result<Vec<Form>> {
        let forms = sqlx::query_as::<_, Form>(
            r#"
            SELECT id, title, fields, status, scheduled_date, password_hash,
                   created_by, created_at
            FROM forms
            WHERE created_by = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(forms)
    }

    async fn update(&self, form: &Form) -> Result<Form> {
        let fields_json =
            serde_json::to_string(&form.fields).map_err(|e| AppError::Internal(e.into()))?;

        sqlx::query(
            r#"
            UPDATE forms
            SET title = ?, fields = ?, status = ?, scheduled_date = ?, password_hash = ?
            WHERE id = ?
            "#,
        )
        .bind(&form.title)
        .bind(&fields_json)
        .bind(form.status)
        .bind(form.scheduled_date)
        .bind(&form.password_hash)
        .bind(form.id)
        .execute(&self.pool)
        .await?;

        // MySQL reports zero affected rows for a no-op update, so re-read instead
        self.find_by_id(form.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Form not found".to_string()))
    }

    async fn delete(&self, id: RecordId) -> Result<()> {
        let result = sqlx::query("DELETE FROM forms WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Form not found".to_string()));
        }

        Ok(())
    }
}
