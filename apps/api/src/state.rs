use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::llm_client::extractor::JsonExtractor;
use crate::llm_client::TextModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Retrying JSON extractor used by every screening stage.
    pub extractor: JsonExtractor,
    /// Raw model handle for prose calls (sentiment reports).
    pub model: Arc<dyn TextModel>,
    pub config: Config,
    /// Cancelled on shutdown; each analysis runs on a child token.
    pub shutdown: CancellationToken,
}
