//! Retrieval: embed the question, search the store, return scored passages.

use embedder::EmbeddingProvider;
use passage_store::{PassageStore, ScoredPassage};
use tracing::trace;

use crate::errors::EngineError;

/// Embeds `query` with the query-side encoder and returns the top-K scored
/// passages with their provenance metadata, best first.
///
/// # Errors
/// Returns `EngineError::Embed` on embedding failures and
/// `EngineError::Store` when the vector store is unreachable.
pub async fn retrieve_passages(
    store: &PassageStore,
    provider: &dyn EmbeddingProvider,
    query: &str,
    limit: u64,
) -> Result<Vec<ScoredPassage>, EngineError> {
    trace!("retrieve_passages limit={limit}");

    let queries = [query.to_string()];
    let query_vector = provider
        .embed_queries(&queries)
        .await?
        .into_iter()
        .next()
        .ok_or(EngineError::EmptyQueryEmbedding)?;

    Ok(store.search(query_vector, limit).await?)
}
