use crate::config::Config;
use crate::ingestion::session::SessionStore;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum
/// extractors. Requests share nothing mutable; each builds its own session
/// through the shared store.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub store: SessionStore,
    pub config: Config,
}
