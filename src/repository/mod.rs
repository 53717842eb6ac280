//! Data access layer (Repository pattern)

pub mod form;
pub mod response;
pub mod user;

pub use form::{FormRepository, FormRepositoryImpl};
pub use response::{ResponseRepository, ResponseRepositoryImpl};
pub use user::{UserRepository, UserRepositoryImpl};
