//! FormHub Core - Form Builder Backend
//!
//! Authenticated users design forms, publish them, and collect responses
//! from anonymous respondents over a JSON REST API.

pub mod api;
pub mod config;
pub mod crypto;
pub mod domain;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod migration;
pub mod policy;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;
pub mod telemetry;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
