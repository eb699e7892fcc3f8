//! Unified error type for the ingestion pipeline.

use embedder::EmbedError;
use passage_store::StoreError;
use thiserror::Error;

/// Top-level error for ingestion operations.
///
/// Per-document recovery (skip, log, continue) happens in the orchestrator
/// loop; this type only describes what went wrong for one step.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Upstream fetch failed (document source or arXiv API).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Embedding the surviving chunks failed.
    #[error("embedding error: {0}")]
    Embed(#[from] EmbedError),

    /// Vector store rejected the upsert or collection operation.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
