//! Domain models for FormHub Core

pub mod form;
pub mod id;
pub mod response;
pub mod user;

pub use form::*;
pub use id::*;
pub use response::*;
pub use user::*;
