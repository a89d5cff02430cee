use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::extraction::FieldExtractor;
use crate::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: SessionStore,
    /// Pluggable extraction backend. Production: the Anthropic client;
    /// tests swap in a stub.
    pub extractor: Arc<dyn FieldExtractor>,
    pub config: Config,
}
