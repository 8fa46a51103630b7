//! Binary entrypoint for the Oqool API server.
use anyhow::Context;
use oqool_api::{run, ApiConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // OQOOL_CONFIG names an optional YAML file; OQOOL_* variables override it
    let config = ApiConfig::load().context("failed to load configuration")?;
    run(config).await
}
