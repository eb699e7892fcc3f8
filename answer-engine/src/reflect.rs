//! Optional "two-hop" query expansion.
//!
//! Expansion is a pure enhancement, never required for correctness of the
//! core answer: in the baseline configuration (no generative model wired)
//! it no-ops and returns an empty list.

use ai_llm_service::{ChatMessage, OpenAiService};
use serde_json::Value;
use tracing::trace;

use crate::claims::Claim;
use crate::errors::EngineError;
use crate::prompts::REFLECT_2HOP;

/// Maximum number of follow-up queries produced by one expansion.
pub const MAX_FOLLOWUPS: usize = 3;

/// Returns up to [`MAX_FOLLOWUPS`] follow-up queries for the question.
///
/// With `llm = None` this is a no-op returning an empty list. Malformed
/// model output degrades to an empty list as well; only transport-level
/// failures are surfaced.
///
/// # Errors
/// Returns `EngineError::Llm` when the chat request itself fails.
pub async fn reflect_two_hop(
    question: &str,
    claims: &[Claim],
    llm: Option<&OpenAiService>,
) -> Result<Vec<String>, EngineError> {
    let Some(svc) = llm else {
        return Ok(Vec::new());
    };

    trace!("reflect_two_hop claims={}", claims.len());
    let payload = serde_json::json!({ "question": question, "claims": claims });
    let messages = [
        ChatMessage::system(REFLECT_2HOP),
        ChatMessage::user(payload.to_string()),
    ];
    let data = svc.chat_json(&messages).await?;
    Ok(followups_from_json(&data))
}

/// Extracts follow-up query strings from a recovered JSON value.
///
/// Anything that is not an array yields an empty list; non-string array
/// elements are stringified rather than dropped.
fn followups_from_json(data: &Value) -> Vec<String> {
    let Some(items) = data.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .map(|x| match x.as_str() {
            Some(s) => s.to_string(),
            None => x.to_string(),
        })
        .take(MAX_FOLLOWUPS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn baseline_configuration_is_a_noop() {
        let followups = reflect_two_hop("what is the Picard group?", &[], None)
            .await
            .unwrap();
        assert!(followups.is_empty());
    }

    #[test]
    fn array_of_strings_is_capped_at_three() {
        let data = json!(["a", "b", "c", "d"]);
        assert_eq!(followups_from_json(&data), vec!["a", "b", "c"]);
    }

    #[test]
    fn non_array_values_yield_no_followups() {
        assert!(followups_from_json(&json!({"not": "an array"})).is_empty());
        assert!(followups_from_json(&json!(null)).is_empty());
        assert!(followups_from_json(&json!("just a string")).is_empty());
    }

    #[test]
    fn non_string_elements_are_stringified() {
        let data = json!([1, "two"]);
        assert_eq!(followups_from_json(&data), vec!["1", "two"]);
    }
}
