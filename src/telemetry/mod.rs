//! Telemetry: structured logging and the optional Prometheus recorder

pub mod metrics;

use crate::config::{LogFormat, TelemetryConfig};
use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "formhub_core=info,tower_http=info";

/// Install the global subscriber and, when enabled, the metrics recorder.
///
/// The returned handle, if any, backs the `/metrics` route.
pub fn init(config: &TelemetryConfig) -> Result<Option<PrometheusHandle>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        // Flattened so `message` sits at the top level of each line
        LogFormat::Json => registry.with(fmt::layer().json().flatten_event(true)).try_init(),
        LogFormat::Text => registry.with(fmt::layer()).try_init(),
    }
    .context("a global tracing subscriber is already installed")?;

    if !config.metrics_enabled {
        return Ok(None);
    }

    let handle = metrics::install_prometheus_recorder()?;
    metrics::describe_metrics();
    Ok(Some(handle))
}
