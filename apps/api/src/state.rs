use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::config::Config;
use crate::llm_client::GeminiClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: GeminiClient,
    pub config: Config,
    /// Caps concurrent calls against the metered LLM API across all
    /// in-flight requests. Sized from `LLM_MAX_CONCURRENCY`.
    pub llm_permits: Arc<Semaphore>,
}
