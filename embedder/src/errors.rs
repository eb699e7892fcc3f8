//! Unified error type for the embedding layer.

use ai_llm_service::AiLlmError;
use thiserror::Error;

/// Top-level error for embedder operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EmbedError {
    /// A required model file (ONNX graph, tokenizer) was not found.
    #[error("[Embedder] model artifact missing: {0}")]
    ModelArtifact(String),

    /// Tokenization failed.
    #[error("[Embedder] tokenizer error: {0}")]
    Tokenizer(String),

    /// ONNX model loading or inference failed.
    #[error("[Embedder] inference error: {0}")]
    Inference(String),

    /// A produced vector does not match the provider's dimensionality.
    #[error("[Embedder] vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Errors from the remote embeddings backend.
    #[error("[Embedder] remote backend: {0}")]
    Llm(#[from] AiLlmError),
}
