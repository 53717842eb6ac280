//! Business logic layer

pub mod auth;
pub mod form;
pub mod response;

pub use auth::AuthService;
pub use form::FormService;
pub use response::ResponseService;
