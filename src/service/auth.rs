//! Account registration, login and token issuance

use crate::crypto::{hash_password, verify_password};
use crate::domain::{AuthTokenResponse, LoginInput, RegisterInput, RecordId, User};
use crate::error::{AppError, Result};
use crate::jwt::JwtManager;
use crate::repository::UserRepository;
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService<U: UserRepository> {
    user_repo: Arc<U>,
    jwt_manager: JwtManager,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(user_repo: Arc<U>, jwt_manager: JwtManager) -> Self {
        Self {
            user_repo,
            jwt_manager,
        }
    }

    pub async fn register(&self, mut input: RegisterInput) -> Result<AuthTokenResponse> {
        input.email = normalize_email(&input.email);
        input.validate()?;

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let user = User {
            id: RecordId::new_v4(),
            email: input.email,
            name: input.name,
            password_hash: hash_password(&input.password)?,
            created_at: Utc::now(),
        };
        let user = self.user_repo.create(&user).await?;
        tracing::info!(user_id = %user.id, "User registered");

        self.issue(user)
    }

    pub async fn login(&self, input: LoginInput) -> Result<AuthTokenResponse> {
        input.validate()?;

        let email = normalize_email(&input.email);
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&input.password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        self.issue(user)
    }

    /// The account behind an authenticated identity
    pub async fn me(&self, user_id: RecordId) -> Result<User> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    fn issue(&self, user: User) -> Result<AuthTokenResponse> {
        let token = self.jwt_manager.create_token(*user.id, &user.email)?;
        Ok(AuthTokenResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_manager.token_ttl(),
            user,
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
