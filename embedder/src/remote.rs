//! Remote embedding backend: OpenAI-compatible `/v1/embeddings`.
//!
//! Batches are forwarded as-is and the API's vectors are returned
//! unmodified. The remote model needs no role prefix, so the document and
//! query paths share one implementation — the split exists to satisfy the
//! common provider contract.

use std::sync::Arc;

use ai_llm_service::services::open_ai_service::OpenAiService;
use tracing::trace;

use crate::{BoxFuture, EmbedError, EmbeddingProvider};

/// Embedding provider backed by a remote OpenAI-compatible API.
#[derive(Clone)]
pub struct RemoteEmbedder {
    svc: Arc<OpenAiService>,
    dim: usize,
}

impl RemoteEmbedder {
    /// Constructs a new remote embedder.
    ///
    /// `dim` is the dimensionality the configured model is expected to
    /// produce; every returned vector is validated against it.
    pub fn new(svc: Arc<OpenAiService>, dim: usize) -> Self {
        Self { svc, dim }
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        trace!("RemoteEmbedder::embed_batch inputs={}", texts.len());

        let vectors = self.svc.embeddings(texts).await?;
        for v in &vectors {
            if v.len() != self.dim {
                return Err(EmbedError::VectorSizeMismatch {
                    got: v.len(),
                    want: self.dim,
                });
            }
        }
        Ok(vectors)
    }
}

impl EmbeddingProvider for RemoteEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_documents<'a>(
        &'a self,
        texts: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, EmbedError>> {
        Box::pin(self.embed_batch(texts))
    }

    fn embed_queries<'a>(
        &'a self,
        texts: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, EmbedError>> {
        Box::pin(self.embed_batch(texts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::LlmModelConfig;

    fn test_embedder() -> RemoteEmbedder {
        let cfg = LlmModelConfig {
            model: "text-embedding-3-large".into(),
            endpoint: "https://api.openai.com".into(),
            api_key: Some("sk-test".into()),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(1),
        };
        RemoteEmbedder::new(Arc::new(OpenAiService::new(cfg).unwrap()), 3072)
    }

    #[tokio::test]
    async fn empty_input_short_circuits_without_a_backend_call() {
        let embedder = test_embedder();
        // An unreachable backend is irrelevant here: no request is made.
        assert_eq!(embedder.embed_documents(&[]).await.unwrap(), Vec::<Vec<f32>>::new());
        assert_eq!(embedder.embed_queries(&[]).await.unwrap(), Vec::<Vec<f32>>::new());
    }

    #[test]
    fn dim_reports_the_configured_dimensionality() {
        assert_eq!(test_embedder().dim(), 3072);
    }
}
