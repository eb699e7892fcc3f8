//! Shared state for all HTTP handlers.

use std::sync::Arc;

use ai_llm_service::OpenAiService;
use ai_llm_service::config::default_config::config_openai_chat;
use answer_engine::QaPipeline;
use passage_store::{PassageStore, StoreConfig};
use tracing::info;

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers: the fully wired query pipeline.
pub struct AppState {
    pub pipeline: QaPipeline,
}

impl AppState {
    /// Wires the pipeline from environment variables.
    ///
    /// Backend choices (embedding backend, generative mode) are resolved
    /// exactly once here and injected; handlers never consult the
    /// environment.
    ///
    /// # Errors
    /// Fails fast when a backend cannot start: unreachable store config,
    /// missing embedding model artifact, or missing credentials in
    /// generative mode. The error names the missing resource.
    pub fn from_env() -> Result<Self, AppError> {
        let store = Arc::new(PassageStore::new(StoreConfig::from_env())?);
        let provider = embedder::provider_from_env()?;

        let llm = if use_llm() {
            info!("generative mode enabled (USE_LLM=true)");
            Some(Arc::new(OpenAiService::new(config_openai_chat()?)?))
        } else {
            None
        };

        Ok(Self {
            pipeline: QaPipeline::new(store, provider, llm),
        })
    }
}

fn use_llm() -> bool {
    std::env::var("USE_LLM")
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
