//! Application state trait for dependency injection
//!
//! Handlers are generic over `HasServices`, so the same router serves the
//! production `AppState` and in-memory test states.

use crate::config::Config;
use crate::jwt::JwtManager;
use crate::repository::{FormRepository, ResponseRepository, UserRepository};
use crate::service::{AuthService, FormService, ResponseService};

pub trait HasServices: Clone + Send + Sync + 'static {
    type FormRepo: FormRepository;
    type ResponseRepo: ResponseRepository;
    type UserRepo: UserRepository;

    /// Get the application configuration
    fn config(&self) -> &Config;

    fn form_service(&self) -> &FormService<Self::FormRepo>;

    fn response_service(&self) -> &ResponseService<Self::ResponseRepo, Self::FormRepo>;

    fn auth_service(&self) -> &AuthService<Self::UserRepo>;

    /// Get the JWT manager used by the request gate and extractors
    fn jwt_manager(&self) -> &JwtManager;

    /// Check whether backing stores are reachable
    fn check_ready(&self) -> impl std::future::Future<Output = bool> + Send;
}
