//! Prometheus metrics setup and metric definitions

use anyhow::{Context, Result};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle> {
    let buckets = [
        0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ];

    PrometheusBuilder::new()
        .set_buckets(&buckets)
        .context("failed to set histogram buckets")?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Register metric descriptions so HELP/TYPE lines appear from startup.
pub fn describe_metrics() {
    describe_counter!("formhub_http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "formhub_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        "formhub_http_requests_in_flight",
        "Number of HTTP requests currently being processed"
    );

    describe_counter!("formhub_forms_created_total", "Forms created");
    describe_counter!("formhub_responses_submitted_total", "Responses accepted");
    describe_counter!(
        "formhub_auth_attempts_total",
        "Register and login attempts by outcome"
    );
}

pub fn record_form_created() {
    counter!("formhub_forms_created_total").increment(1);
}

pub fn record_response_submitted() {
    counter!("formhub_responses_submitted_total").increment(1);
}

pub fn record_auth_attempt(action: &'static str, success: bool) {
    let result = if success { "success" } else { "failure" };
    counter!("formhub_auth_attempts_total", "action" => action, "result" => result).increment(1);
}
