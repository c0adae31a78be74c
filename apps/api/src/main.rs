mod analysis;
mod config;
mod errors;
mod ingestion;
mod llm_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::ingestion::session::SessionStore;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("resume_scorer_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Scorer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::from_config(&config)?;
    info!(
        "LLM client initialized (provider: {}, model: {})",
        llm.provider(),
        llm.model()
    );

    let store = SessionStore::new(config.data_storage_path.clone());
    info!("Session storage base: {}", store.base().display());

    // One-shot sweep of expired sessions; retention is off unless configured.
    if let Some(hours) = config.session_retention_hours {
        match store.purge_older_than(retention_window(hours)) {
            Ok(removed) => info!("Session retention sweep removed {removed} expired session(s)"),
            Err(e) => warn!("Session retention sweep failed: {e}"),
        }
    }

    // Build app state
    let state = AppState {
        llm,
        store,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Saturates so an absurd `SESSION_RETENTION_HOURS` value cannot overflow.
fn retention_window(hours: u64) -> Duration {
    Duration::from_secs(hours.saturating_mul(3600))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retention_window_saturates_on_huge_values() {
        assert_eq!(retention_window(1), Duration::from_secs(3600));
        assert_eq!(retention_window(u64::MAX), Duration::from_secs(u64::MAX));
    }
}
