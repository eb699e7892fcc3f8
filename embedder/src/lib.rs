//! Dual-backend text embedding with one common contract.
//!
//! Two interchangeable backends produce fixed-dimension vectors behind the
//! [`EmbeddingProvider`] trait, selected once at startup and never mixed
//! within one collection:
//!
//! - **remote** — batches are forwarded to an OpenAI-compatible
//!   `/v1/embeddings` endpoint and returned unmodified;
//! - **local** — ONNX inference (BGE-M3 style) with role prefixes,
//!   truncating tokenization, attention-mask mean pooling, and L2
//!   normalization.
//!
//! Callers hold an `Arc<dyn EmbeddingProvider>` and never branch on backend
//! identity. Document-side and query-side calls go through separate methods
//! because asymmetric models require distinct role prefixes; collapsing the
//! two silently degrades retrieval instead of crashing.

mod errors;
mod local_onnx;
mod pooling;
mod remote;

pub use errors::EmbedError;
pub use local_onnx::{LocalOnnxEmbedder, PASSAGE_PREFIX, QUERY_PREFIX};
pub use pooling::{l2_normalize, mean_pool};
pub use remote::RemoteEmbedder;

use std::path::PathBuf;
use std::sync::Arc;
use std::{future::Future, pin::Pin};

use ai_llm_service::config::default_config::config_openai_embedding;
use ai_llm_service::services::open_ai_service::OpenAiService;
use tracing::info;

/// Boxed future used by the object-safe provider trait.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Dense embedding dimension of the default remote model
/// (`text-embedding-3-large`).
pub const REMOTE_EMBED_DIM: usize = 3072;

/// Dense embedding dimension of the default local model (BGE-M3).
pub const LOCAL_EMBED_DIM: usize = 1024;

/// Provider interface for embedding generation.
///
/// Both methods return vectors of one fixed dimensionality per provider
/// instance, in input order, one vector per input, with no silent dropping.
/// An empty input yields an empty output without touching the backend.
pub trait EmbeddingProvider: Send + Sync {
    /// Fixed output dimensionality of this provider instance.
    fn dim(&self) -> usize;

    /// Embeds passages/chunks (document side).
    fn embed_documents<'a>(
        &'a self,
        texts: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, EmbedError>>;

    /// Embeds search queries (query side).
    fn embed_queries<'a>(
        &'a self,
        texts: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, EmbedError>>;
}

/// Embedding backend selected at process startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmbedBackend {
    /// Local ONNX inference (default).
    Onnx,
    /// Remote OpenAI-compatible embeddings API.
    OpenAi,
}

/// Runtime settings for the embedding layer, resolved once from env.
#[derive(Clone, Debug)]
pub struct EmbedSettings {
    /// Which backend to construct.
    pub backend: EmbedBackend,
    /// Directory holding the ONNX artifact and `tokenizer.json`.
    pub model_dir: PathBuf,
    /// Token truncation length for the local tokenizer.
    pub max_tokens: usize,
    /// Local inference batch size (throughput only; must not change output).
    pub batch_size: usize,
    /// Optional override of the expected vector dimensionality.
    pub dim: Option<usize>,
}

impl EmbedSettings {
    /// Reads settings from environment variables.
    ///
    /// - `EMBED_BACKEND`   — `openai` for the remote API, anything else
    ///   (or unset) selects the local ONNX backend
    /// - `ONNX_MODEL_DIR`  — model directory (default `models/bge_m3_onnx`)
    /// - `EMBED_MAX_TOKENS` — truncation length (default 512)
    /// - `EMBED_BATCH_SIZE` — local batch size (default 64)
    /// - `EMBED_DIM`       — optional dimensionality override
    pub fn from_env() -> Self {
        let backend = match std::env::var("EMBED_BACKEND") {
            Ok(v) if v.trim().eq_ignore_ascii_case("openai") => EmbedBackend::OpenAi,
            _ => EmbedBackend::Onnx,
        };
        Self {
            backend,
            model_dir: PathBuf::from(env_or("ONNX_MODEL_DIR", "models/bge_m3_onnx")),
            max_tokens: env_parse_or("EMBED_MAX_TOKENS", 512),
            batch_size: env_parse_or("EMBED_BATCH_SIZE", 64),
            dim: std::env::var("EMBED_DIM")
                .ok()
                .and_then(|v| v.parse::<usize>().ok()),
        }
    }
}

impl Default for EmbedSettings {
    fn default() -> Self {
        Self {
            backend: EmbedBackend::Onnx,
            model_dir: PathBuf::from("models/bge_m3_onnx"),
            max_tokens: 512,
            batch_size: 64,
            dim: None,
        }
    }
}

/// Builds the configured embedding provider from environment settings.
///
/// Backend choice is resolved exactly once here; everything downstream sees
/// only the trait object.
///
/// # Errors
/// Fails fast when the selected backend cannot start: missing
/// `OPENAI_API_KEY` for the remote backend, missing model artifact or
/// tokenizer for the local one. The error names the missing resource.
pub fn provider_from_env() -> Result<Arc<dyn EmbeddingProvider>, EmbedError> {
    let settings = EmbedSettings::from_env();
    match settings.backend {
        EmbedBackend::OpenAi => {
            let cfg = config_openai_embedding()?;
            let svc = OpenAiService::new(cfg)?;
            let dim = settings.dim.unwrap_or(REMOTE_EMBED_DIM);
            info!(dim, "embedding backend: remote OpenAI-compatible API");
            Ok(Arc::new(RemoteEmbedder::new(Arc::new(svc), dim)))
        }
        EmbedBackend::Onnx => {
            let embedder = LocalOnnxEmbedder::load(&settings)?;
            info!(dim = embedder.dim(), model_dir = %settings.model_dir.display(), "embedding backend: local ONNX");
            Ok(Arc::new(embedder))
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_parse_or(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}
