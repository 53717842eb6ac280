//! API integration tests infrastructure
//!
//! In-memory repository implementations and token helpers shared by the
//! HTTP handler tests.


use async_trait::async_trait;
use chrono::Utc;
use formhub_core::config::JwtConfig;
use formhub_core::domain::{Field, Form, FormResponse, FormStatus, RecordId, User};
use formhub_core::error::{AppError, Result};
use formhub_core::jwt::JwtManager;
use formhub_core::repository::{FormRepository, ResponseRepository, UserRepository};
use tokio::sync::RwLock;
use uuid::Uuid;

// ============================================================================
// Test Configuration
// ============================================================================

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key-for-api-testing-purposes".to_string(),
        issuer: "formhub-test".to_string(),
        token_ttl_secs: 3600,
    }
}

pub fn create_test_jwt_manager() -> JwtManager {
    JwtManager::new(test_jwt_config())
}

/// Token for an arbitrary user id
pub fn create_test_token_for_user(user_id: Uuid) -> String {
    create_test_jwt_manager()
        .create_token(user_id, "owner@example.com")
        .expect("Failed to create test token")
}

/// A fresh identity and a token for it
pub fn create_test_identity() -> (RecordId, String) {
    let user_id = Uuid::new_v4();
    (RecordId::from(user_id), create_test_token_for_user(user_id))
}

pub fn text_field(label: &str, required: bool) -> Field {
    Field {
        field_type: "text".to_string(),
        label: label.to_string(),
        required,
        options: vec![],
        conditional: None,
    }
}

/// An open, unprotected form with one required and one optional field
pub fn create_test_form(owner: RecordId) -> Form {
    Form {
        id: RecordId::new_v4(),
        title: "Customer Survey".to_string(),
        fields: vec![text_field("Name", true), text_field("Comments", false)],
        status: FormStatus::Open,
        scheduled_date: None,
        password_hash: None,
        created_by: owner,
        created_at: Utc::now(),
    }
}

// ============================================================================
// Test Repository Implementations
// ============================================================================

pub struct TestFormRepository {
    forms: RwLock<Vec<Form>>,
}

impl TestFormRepository {
    pub fn new() -> Self {
        Self {
            forms: RwLock::new(vec![]),
        }
    }

    pub async fn add_form(&self, form: Form) {
        self.forms.write().await.push(form);
    }

    pub async fn count(&self) -> usize {
        self.forms.read().await.len()
    }
}

impl Default for TestFormRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FormRepository for TestFormRepository {
    async fn create(&self, form: &Form) -> Result<Form> {
        self.forms.write().await.push(form.clone());
        Ok(form.clone())
    }

    async fn find_by_id(&self, id: RecordId) -> Result<Option<Form>> {
        let forms = self.forms.read().await;
        Ok(forms.iter().find(|f| f.id == id).cloned())
    }

    async fn list_by_owner(&self, owner_id: RecordId) -> Result<Vec<Form>> {
        let forms = self.forms.read().await;
        let mut owned: Vec<Form> = forms
            .iter()
            .filter(|f| f.created_by == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn update(&self, form: &Form) -> Result<Form> {
        let mut forms = self.forms.write().await;
        let existing = forms
            .iter_mut()
            .find(|f| f.id == form.id)
            .ok_or_else(|| AppError::NotFound("Form not found".to_string()))?;
        *existing = form.clone();
        Ok(form.clone())
    }

    async fn delete(&self, id: RecordId) -> Result<()> {
        let mut forms = self.forms.write().await;
        let before = forms.len();
        forms.retain(|f| f.id != id);
        if forms.len() == before {
            return Err(AppError::NotFound("Form not found".to_string()));
        }
        Ok(())
    }
}

pub struct TestResponseRepository {
    responses: RwLock<Vec<FormResponse>>,
}

impl TestResponseRepository {
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(vec![]),
        }
    }

    pub async fn add_response(&self, response: FormResponse) {
        self.responses.write().await.push(response);
    }

    pub async fn count(&self) -> usize {
        self.responses.read().await.len()
    }
}

impl Default for TestResponseRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseRepository for TestResponseRepository {
    async fn create(&self, response: &FormResponse) -> Result<FormResponse> {
        self.responses.write().await.push(response.clone());
        Ok(response.clone())
    }

    async fn find_by_id(&self, id: RecordId) -> Result<Option<FormResponse>> {
        let responses = self.responses.read().await;
        Ok(responses.iter().find(|r| r.id == id).cloned())
    }

    async fn list_by_form(&self, form_id: RecordId) -> Result<Vec<FormResponse>> {
        let responses = self.responses.read().await;
        let mut matching: Vec<FormResponse> = responses
            .iter()
            .filter(|r| r.form_id == form_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(matching)
    }

    async fn delete(&self, id: RecordId) -> Result<()> {
        let mut responses = self.responses.write().await;
        let before = responses.len();
        responses.retain(|r| r.id != id);
        if responses.len() == before {
            return Err(AppError::NotFound("Response not found".to_string()));
        }
        Ok(())
    }
}

pub struct TestUserRepository {
    users: RwLock<Vec<User>>,
}

impl TestUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(vec![]),
        }
    }
}

impl Default for TestUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for TestUserRepository {
    async fn create(&self, user: &User) -> Result<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(
                "Email is already registered".to_string(),
            ));
        }
        users.push(user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: RecordId) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}
