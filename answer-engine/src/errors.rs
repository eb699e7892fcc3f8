//! Unified error type for the query pipeline.

use ai_llm_service::AiLlmError;
use embedder::EmbedError;
use passage_store::StoreError;
use thiserror::Error;

/// Top-level error for answer-engine operations.
///
/// Grounding failures (no passages retrieved, no claims extracted) are NOT
/// errors; they surface as an explicit empty/placeholder answer.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Embedding the question failed.
    #[error("embedding error: {0}")]
    Embed(#[from] EmbedError),

    /// The vector store was unreachable or rejected the search.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The generative completion step failed (enhanced mode only).
    #[error("llm error: {0}")]
    Llm(#[from] AiLlmError),

    /// The provider returned no vector for the question.
    #[error("no embedding produced for the query")]
    EmptyQueryEmbedding,
}
