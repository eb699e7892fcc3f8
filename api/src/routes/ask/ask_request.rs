use answer_engine::Claim;
use passage_store::ScoredPassage;
use serde::{Deserialize, Serialize};

/// Request payload for /ask.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Natural language question.
    pub question: String,
    /// Number of passages to retrieve.
    #[serde(default = "default_top_k")]
    pub top_k: u64,
}

fn default_top_k() -> u64 {
    8
}

/// Response payload for /ask.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// Final answer (plain text).
    pub answer: String,
    /// The claims the answer is built from, in order.
    pub claims: Vec<Claim>,
    /// The retrieved passages, best first, for transparency.
    pub passages: Vec<ScoredPassage>,
    /// Optional two-hop follow-up queries (empty in baseline mode).
    pub followups: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_k_defaults_to_eight() {
        let req: AskRequest = serde_json::from_str(r#"{"question": "what?"}"#).unwrap();
        assert_eq!(req.top_k, 8);
    }

    #[test]
    fn explicit_top_k_is_honored() {
        let req: AskRequest =
            serde_json::from_str(r#"{"question": "what?", "top_k": 3}"#).unwrap();
        assert_eq!(req.top_k, 3);
    }
}
