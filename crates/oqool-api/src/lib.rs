//! Oqool API /v1: REST endpoints for classification, API keys and developer commands
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod state;

pub use config::{ApiConfig, ConfigError};
pub use error::ApiError;
pub use state::AppState;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use oqool_keys::ApiKeyAuthority;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/v1/generate-key", post(handlers::generate_key))
        .route("/v1/verify-key", post(handlers::verify_key))
        .route("/v1/commands", post(handlers::execute_command))
        .route("/v1/classify", post(handlers::classify))
        .route("/v1/keys", get(handlers::list_keys))
        .route("/v1/keys/{id}/revoke", post(handlers::revoke_key))
        .route("/v1/keys/cleanup", post(handlers::cleanup_keys))
        .route("/v1/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(middleware::log_requests))
                .layer(middleware::cors()),
        )
}

/// Sweep expired keys every `every`, starting one interval from now.
pub fn spawn_key_cleanup(keys: Arc<ApiKeyAuthority>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = keys.cleanup_expired_keys();
            if removed > 0 {
                tracing::info!(removed, "expired API keys removed");
            }
        }
    })
}

pub async fn run(config: ApiConfig) -> anyhow::Result<()> {
    let addr = config.addr.clone();
    let cleanup = config.cleanup_interval_secs;
    let state = AppState::from_config(config).context("failed to register metrics")?;

    if let Some(secs) = cleanup.filter(|s| *s > 0) {
        spawn_key_cleanup(state.keys.clone(), Duration::from_secs(secs));
    }

    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("Oqool API listening on {}", addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
