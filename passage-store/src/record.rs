//! Core data models used by the library.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A passage ready to be persisted: text, provenance, and its embedding.
///
/// Built during ingestion after junk-filtering; never mutated once stored.
#[derive(Clone, Debug)]
pub struct PassagePoint {
    pub arxiv_id: String,
    pub section: String,
    pub source_html: String,
    pub text: String,
    pub vector: Vec<f32>,
}

/// A single retrieval hit: stored payload plus similarity score.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoredPassage {
    pub score: f32,
    pub text: String,
    pub arxiv_id: String,
    pub section: String,
    pub source_html: String,
}

impl ScoredPassage {
    /// Normalizes a raw Qdrant payload into a typed hit.
    ///
    /// Older dumps stored the chunk under `chunk_text`; both keys are
    /// accepted. Missing provenance fields default to empty strings.
    pub fn from_payload(score: f32, payload: &Value) -> Self {
        let text = payload
            .get("text")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .or_else(|| payload.get("chunk_text").and_then(|v| v.as_str()))
            .unwrap_or_default()
            .to_string();
        Self {
            score,
            text,
            arxiv_id: str_field(payload, "arxiv_id"),
            section: str_field(payload, "section"),
            source_html: str_field(payload, "source_html"),
        }
    }
}

fn str_field(payload: &Value, key: &str) -> String {
    payload
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Deterministic UUIDv5 point id from the passage identity.
///
/// Re-ingesting an unchanged document therefore produces the same point set
/// instead of accumulating duplicates.
pub fn stable_point_id(arxiv_id: &str, section: &str, text: &str) -> Uuid {
    let key = format!("{arxiv_id}::{section}::{text}");
    Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_bytes())
}
