//! Compose the final answer from claims.
//!
//! Baseline: a deterministic citation-bulleted list (no model involved).
//! Enhanced: the same claim set goes verbatim to the chat model under a
//! strict claims-only instruction. Either way the claims are pre-tagged, so
//! the generative step is never the only place citations are enforced.

use ai_llm_service::{ChatMessage, OpenAiService};
use tracing::trace;

use crate::claims::Claim;
use crate::errors::EngineError;
use crate::prompts::ANSWER_COMPOSER;

/// Fixed reply when retrieval produced nothing to ground an answer on.
pub const NO_GROUNDING_MESSAGE: &str =
    "I couldn't find grounded passages for that question.";

/// Renders one claim as a cited bullet line.
pub fn render_bullet(claim: &Claim) -> String {
    format!(
        "- {} [arXiv:{}, {}]",
        claim.claim, claim.arxiv_id, claim.section
    )
}

/// Renders the full bullet list, one line per claim, in claim order.
pub fn render_bullets(claims: &[Claim]) -> String {
    claims.iter().map(render_bullet).collect::<Vec<_>>().join("\n")
}

/// Baseline composition: a pure function of the claim list. Same claims in
/// the same order produce byte-identical output.
pub fn compose_baseline(question: &str, claims: &[Claim]) -> String {
    format!(
        "Grounded statements related to: {question}\n{}",
        render_bullets(claims)
    )
}

/// Composes the final answer.
///
/// With no claims the fixed [`NO_GROUNDING_MESSAGE`] is returned — content
/// is never fabricated. With `llm = None` the deterministic baseline is
/// used; otherwise the pre-rendered bullets are handed to the chat model
/// under the claims-only instruction.
///
/// # Errors
/// Returns `EngineError::Llm` when the chat request fails (enhanced mode
/// only).
pub async fn compose_answer(
    question: &str,
    claims: &[Claim],
    llm: Option<&OpenAiService>,
) -> Result<String, EngineError> {
    if claims.is_empty() {
        return Ok(NO_GROUNDING_MESSAGE.to_string());
    }

    let Some(svc) = llm else {
        return Ok(compose_baseline(question, claims));
    };

    trace!("compose_answer via LLM, claims={}", claims.len());
    let messages = [
        ChatMessage::system(ANSWER_COMPOSER),
        ChatMessage::user(format!(
            "Question: {question}\n\nClaims:\n{}",
            render_bullets(claims)
        )),
    ];
    Ok(svc.chat(&messages).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(text: &str, arxiv_id: &str, section: &str) -> Claim {
        Claim {
            claim: text.to_string(),
            arxiv_id: arxiv_id.to_string(),
            section: section.to_string(),
        }
    }

    #[tokio::test]
    async fn no_claims_returns_the_fixed_message() {
        let answer = compose_answer("anything?", &[], None).await.unwrap();
        assert_eq!(answer, NO_GROUNDING_MESSAGE);
    }

    #[tokio::test]
    async fn baseline_renders_one_cited_bullet_per_claim() {
        let claims = vec![
            claim(
                "The Néron–Severi group is finitely generated.",
                "2508.00001",
                "Background",
            ),
            claim(
                "It measures divisors modulo algebraic equivalence.",
                "2508.00001",
                "Background",
            ),
        ];
        let answer = compose_answer("What is the Néron–Severi group?", &claims, None)
            .await
            .unwrap();

        let lines: Vec<&str> = answer.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Grounded statements related to: What is the Néron–Severi group?"
        );
        assert!(lines[1].starts_with("- The Néron–Severi group"));
        for bullet in &lines[1..] {
            assert!(bullet.ends_with("[arXiv:2508.00001, Background]"));
        }
    }

    #[tokio::test]
    async fn baseline_output_is_deterministic() {
        let claims = vec![claim("A fact.", "2508.00002", "Intro")];
        let a = compose_answer("q", &claims, None).await.unwrap();
        let b = compose_answer("q", &claims, None).await.unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn answer_is_reconstructible_from_the_claims() {
        // Every bullet line is exactly one claim plus its citation tag.
        let claims = vec![
            claim("First.", "2508.00001", "S1"),
            claim("Second.", "2508.00002", "S2"),
        ];
        let rendered = render_bullets(&claims);
        for (line, c) in rendered.lines().zip(&claims) {
            assert_eq!(line, render_bullet(c));
        }
    }
}
