use std::sync::Arc;

use crate::llm_client::InferenceClient;
use crate::research::fetcher::PageFetcher;
use crate::session::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Holds no per-request mutable state; sessions live in the external store.
#[derive(Clone)]
pub struct AppState {
    /// Inference endpoint. Default: `LlmClient` (Workers AI).
    pub llm: Arc<dyn InferenceClient>,
    /// Public page fetcher. Default: `ReaderProxyFetcher`.
    pub fetcher: Arc<dyn PageFetcher>,
    pub sessions: SessionStore,
}
