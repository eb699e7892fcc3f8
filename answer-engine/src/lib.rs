//! Query pipeline: retrieval → claims → optional reflection → composition.
//!
//! One question is handled by one sequential chain of suspendable steps;
//! each step depends on the previous step's output, so there is no internal
//! fan-out. Concurrent questions share only read-only state: the vector
//! collection, the embedding provider, and the optional chat service.

mod answerer;
mod claims;
mod errors;
mod prompts;
mod reflect;
mod retrieval;

pub use answerer::{NO_GROUNDING_MESSAGE, compose_answer, compose_baseline, render_bullets};
pub use claims::{Claim, extract_claims, first_sentences};
pub use errors::EngineError;
pub use prompts::{ANSWER_COMPOSER, REFLECT_2HOP};
pub use reflect::{MAX_FOLLOWUPS, reflect_two_hop};
pub use retrieval::retrieve_passages;

use std::sync::Arc;

use ai_llm_service::OpenAiService;
use embedder::EmbeddingProvider;
use passage_store::{PassageStore, ScoredPassage};
use tracing::debug;

/// Claims cap for one answer.
pub const MAX_CLAIMS: usize = 8;

/// Everything one answered question produces.
#[derive(Clone, Debug, serde::Serialize)]
pub struct QaOutcome {
    pub answer: String,
    pub claims: Vec<Claim>,
    pub passages: Vec<ScoredPassage>,
    pub followups: Vec<String>,
}

/// The wired query pipeline.
///
/// Holds only shared read-only collaborators; the pipeline itself is
/// stateless per question and safe to call concurrently.
pub struct QaPipeline {
    store: Arc<PassageStore>,
    provider: Arc<dyn EmbeddingProvider>,
    llm: Option<Arc<OpenAiService>>,
}

impl QaPipeline {
    /// Wires the pipeline. Pass `llm = None` for the baseline (deterministic,
    /// no generative augmentation) configuration.
    pub fn new(
        store: Arc<PassageStore>,
        provider: Arc<dyn EmbeddingProvider>,
        llm: Option<Arc<OpenAiService>>,
    ) -> Self {
        Self {
            store,
            provider,
            llm,
        }
    }

    /// Answers one question:
    /// 1. embed & search (top `top_k` passages),
    /// 2. extract verbatim claims from the retrieved text,
    /// 3. optionally expand the query (no-op in baseline mode),
    /// 4. compose the final answer.
    ///
    /// Zero retrieved passages is not an error; the composer returns its
    /// fixed no-grounding message and the claim list stays empty.
    ///
    /// # Errors
    /// Returns `EngineError` on embedding, store, or LLM failures.
    pub async fn ask(&self, question: &str, top_k: u64) -> Result<QaOutcome, EngineError> {
        let passages =
            retrieve_passages(self.store.as_ref(), self.provider.as_ref(), question, top_k)
                .await?;
        debug!("retrieved {} passages", passages.len());

        let claims = extract_claims(&passages, MAX_CLAIMS);
        debug!("extracted {} claims", claims.len());

        let followups = reflect_two_hop(question, &claims, self.llm.as_deref()).await?;
        let answer = compose_answer(question, &claims, self.llm.as_deref()).await?;

        Ok(QaOutcome {
            answer,
            claims,
            passages,
            followups,
        })
    }
}
