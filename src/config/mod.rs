//! Configuration management for FormHub Core
//!
//! Everything comes from environment variables (a `.env` file is loaded by
//! `main` first). Only `DATABASE_URL` and `JWT_SECRET` are mandatory.

use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    /// Allowed CORS origins (empty means any origin)
    pub cors_allowed_origins: Vec<String>,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HS256 signing secret
    pub secret: String,
    pub issuer: String,
    pub token_ttl_secs: i64,
}

/// Log line encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => bail!("unknown log format '{}', expected text or json", other),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    pub log_format: LogFormat,
    /// Install the Prometheus recorder and mount `/metrics`
    pub metrics_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| var(key).with_context(|| format!("{} is required", key));
        let or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            http_host: or("HTTP_HOST", "0.0.0.0"),
            http_port: parse_var("PORT", or("PORT", "4000"))?,
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: parse_var(
                    "DATABASE_MAX_CONNECTIONS",
                    or("DATABASE_MAX_CONNECTIONS", "10"),
                )?,
                min_connections: parse_var(
                    "DATABASE_MIN_CONNECTIONS",
                    or("DATABASE_MIN_CONNECTIONS", "1"),
                )?,
            },
            jwt: JwtConfig {
                secret: required("JWT_SECRET")?,
                issuer: or("JWT_ISSUER", "formhub"),
                token_ttl_secs: parse_var(
                    "JWT_TOKEN_TTL_SECS",
                    or("JWT_TOKEN_TTL_SECS", "3600"),
                )?,
            },
            cors_allowed_origins: parse_list(var("CORS_ALLOWED_ORIGINS")),
            telemetry: TelemetryConfig {
                log_format: parse_var("LOG_FORMAT", or("LOG_FORMAT", "text"))?,
                metrics_enabled: var("METRICS_ENABLED")
                    .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1")),
            },
        })
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

fn parse_var<T>(key: &str, raw: String) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid {} '{}': {}", key, raw, e))
}

/// Split a comma-separated value, dropping blank entries.
fn parse_list(value: Option<String>) -> Vec<String> {
    value
        .map(|s| {
            s.split(',')
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default()
}
