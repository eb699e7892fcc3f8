//! Passage persistence and retrieval over Qdrant.
//!
//! This crate owns the one collection the system writes to:
//! - collection lifecycle (create/recreate with a fixed dimensionality and
//!   cosine distance — re-creation is the only deletion path),
//! - batched upserts of embedded passages,
//! - similarity search returning scored, provenance-carrying hits.
//!
//! The design is flat (no deep nesting) and splits responsibilities into
//! focused modules; application code goes through the [`PassageStore`]
//! facade and never touches `qdrant-client` types.

mod config;
mod errors;
mod qdrant_facade;
mod record;

pub use config::{DistanceKind, StoreConfig};
pub use errors::StoreError;
pub use record::{PassagePoint, ScoredPassage, stable_point_id};

use qdrant_client::qdrant::{PointId, PointStruct, Vector, Vectors, vectors};
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::qdrant_facade::qstring;

/// High-level facade that wires configuration and the Qdrant client.
///
/// This is the single entry point recommended for application code.
pub struct PassageStore {
    cfg: StoreConfig,
    client: qdrant_facade::QdrantFacade,
}

impl PassageStore {
    /// Constructs a new store from the given configuration.
    ///
    /// # Errors
    /// Returns `StoreError::Config` if validation fails or the client cannot
    /// be initialized.
    pub fn new(cfg: StoreConfig) -> Result<Self, StoreError> {
        trace!("PassageStore::new collection={}", cfg.collection);
        let client = qdrant_facade::QdrantFacade::new(&cfg)?;
        Ok(Self { cfg, client })
    }

    /// Target collection name.
    pub fn collection(&self) -> &str {
        &self.cfg.collection
    }

    /// Drops and re-creates the collection for the given vector size.
    ///
    /// Must be called when the embedding backend (and therefore the
    /// dimensionality) changes; mixing dimensionalities is rejected at
    /// upsert time, never silently truncated.
    ///
    /// # Errors
    /// Returns `StoreError::Qdrant` on client failures.
    pub async fn recreate_collection(&self, dim: usize) -> Result<(), StoreError> {
        self.client.recreate_collection(dim).await
    }

    /// Upserts passages in batches of `cfg.upsert_batch`.
    ///
    /// Batch boundaries carry no semantics; they only bound request size.
    /// Every vector is validated against `dim` first.
    ///
    /// # Errors
    /// Returns `StoreError::VectorSizeMismatch` on a wrong-sized vector and
    /// `StoreError::Qdrant` on client failures.
    pub async fn upsert_passages(
        &self,
        passages: &[PassagePoint],
        dim: usize,
    ) -> Result<u64, StoreError> {
        let mut total: u64 = 0;
        let batch_size = self.cfg.upsert_batch.max(1);
        for chunk in passages.chunks(batch_size) {
            let points = build_points(chunk, dim)?;
            total += self.client.upsert_points(points).await?;
        }
        debug!("Upserted {} passages total", total);
        Ok(total)
    }

    /// Performs a similarity search and returns typed hits in descending
    /// score order.
    ///
    /// # Errors
    /// Returns `StoreError::Qdrant` if the search fails (including a query
    /// vector whose dimensionality does not match the collection).
    pub async fn search(
        &self,
        query_vector: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<ScoredPassage>, StoreError> {
        trace!("PassageStore::search limit={limit}");
        let hits = self
            .client
            .search(query_vector, limit, self.cfg.exact_search)
            .await?;
        Ok(hits
            .into_iter()
            .map(|(score, payload)| ScoredPassage::from_payload(score, &payload))
            .collect())
    }
}

/// Builds Qdrant points for a batch of passages.
///
/// Point ids are deterministic UUIDv5 values so re-ingestion of unchanged
/// content is idempotent. The payload mirrors the retrieval schema:
/// `text`, `arxiv_id`, `section`, `source_html`.
fn build_points(chunk: &[PassagePoint], dim: usize) -> Result<Vec<PointStruct>, StoreError> {
    let mut pts = Vec::with_capacity(chunk.len());

    for p in chunk {
        if p.vector.len() != dim {
            return Err(StoreError::VectorSizeMismatch {
                got: p.vector.len(),
                want: dim,
            });
        }

        let mut payload = HashMap::new();
        payload.insert("text".to_string(), qstring(&p.text));
        payload.insert("arxiv_id".to_string(), qstring(&p.arxiv_id));
        payload.insert("section".to_string(), qstring(&p.section));
        payload.insert("source_html".to_string(), qstring(&p.source_html));

        let pid: PointId = stable_point_id(&p.arxiv_id, &p.section, &p.text)
            .to_string()
            .into();

        let vectors = Vectors {
            vectors_options: Some(vectors::VectorsOptions::Vector(Vector {
                data: p.vector.clone(),
                indices: None,
                vectors_count: None,
                vector: None,
            })),
        };

        pts.push(PointStruct {
            id: Some(pid),
            payload,
            vectors: Some(vectors),
            ..Default::default()
        });
    }

    Ok(pts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passage(text: &str, vector: Vec<f32>) -> PassagePoint {
        PassagePoint {
            arxiv_id: "2508.00001".into(),
            section: "Background".into(),
            source_html: "https://ar5iv.org/html/2508.00001".into(),
            text: text.into(),
            vector,
        }
    }

    #[test]
    fn build_points_rejects_wrong_dimensionality() {
        let batch = vec![passage("ok", vec![0.1, 0.2]), passage("bad", vec![0.1])];
        let err = build_points(&batch, 2).unwrap_err();
        assert!(matches!(
            err,
            StoreError::VectorSizeMismatch { got: 1, want: 2 }
        ));
    }

    #[test]
    fn build_points_produces_one_point_per_passage() {
        let batch = vec![
            passage("first chunk", vec![0.1, 0.2]),
            passage("second chunk", vec![0.3, 0.4]),
        ];
        let pts = build_points(&batch, 2).unwrap();
        assert_eq!(pts.len(), 2);
        assert!(pts.iter().all(|p| p.id.is_some()));
    }

    #[test]
    fn identical_passages_map_to_identical_point_ids() {
        // Idempotent re-ingestion relies on deterministic ids.
        let a = build_points(&[passage("same text", vec![0.0, 1.0])], 2).unwrap();
        let b = build_points(&[passage("same text", vec![0.0, 1.0])], 2).unwrap();
        assert_eq!(a[0].id, b[0].id);
    }
}
