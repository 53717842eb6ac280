use anyhow::Result;
use formhub_core::{config::Config, server, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let prometheus_handle = telemetry::init(&config.telemetry)?;

    info!("Starting FormHub Core Service");
    info!("HTTP server listening on {}", config.http_addr());

    server::run(config, prometheus_handle).await
}
