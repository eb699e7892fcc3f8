//! Best-effort JSON recovery from free-form model text.
//!
//! Models asked to "return ONLY JSON" still wrap replies in prose often
//! enough that a strict parse is not sufficient. The recovery chain is
//! explicit so each step is independently testable:
//!
//! 1. strict `serde_json` parse of the whole reply;
//! 2. parse of the outermost `[...]` span;
//! 3. parse of the outermost `{...}` span;
//! 4. give up (`None`).

use serde_json::Value;

/// Attempts to recover a JSON value from a raw model reply.
///
/// Returns `None` when no step of the fallback chain yields valid JSON;
/// callers are expected to degrade to an empty structure rather than fail.
pub fn recover_json(raw: &str) -> Option<Value> {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        return Some(v);
    }
    if let Some(v) = parse_span(raw, '[', ']') {
        return Some(v);
    }
    parse_span(raw, '{', '}')
}

/// Parses the outermost `open..close` span of `raw`, if one exists and is
/// valid JSON.
fn parse_span(raw: &str, open: char, close: char) -> Option<Value> {
    let start = raw.find(open)?;
    let end = raw.rfind(close)?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&raw[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strict_parse_wins() {
        let v = recover_json(r#"{"a": 1}"#).unwrap();
        assert_eq!(v, json!({"a": 1}));
    }

    #[test]
    fn salvages_array_from_prose() {
        let raw = "Sure! Here are the queries:\n[\"one\", \"two\"]\nHope that helps.";
        let v = recover_json(raw).unwrap();
        assert_eq!(v, json!(["one", "two"]));
    }

    #[test]
    fn salvages_object_from_prose() {
        let raw = "The result is {\"claim\": \"x\"} as requested.";
        let v = recover_json(raw).unwrap();
        assert_eq!(v, json!({"claim": "x"}));
    }

    #[test]
    fn prefers_array_span_over_object_span() {
        // Both spans present; the array step runs first.
        let raw = "noise [1, 2] more {\"a\": 3} noise";
        let v = recover_json(raw).unwrap();
        assert!(v.is_array());
    }

    #[test]
    fn unrecoverable_text_yields_none() {
        assert!(recover_json("no json here at all").is_none());
        assert!(recover_json("broken [1, 2").is_none());
        assert!(recover_json("").is_none());
    }
}
