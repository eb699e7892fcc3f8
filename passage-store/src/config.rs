//! Runtime and collection configuration.

use crate::errors::StoreError;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug)]
pub enum DistanceKind {
    /// Cosine distance (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

/// Configuration for passage persistence and retrieval.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Upsert batch size; bounds request size, carries no semantics.
    pub upsert_batch: usize,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
}

impl StoreConfig {
    /// Creates a sane default config for a given collection name and Qdrant
    /// endpoint.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            distance: DistanceKind::Cosine,
            upsert_batch: 128,
            exact_search: false,
        }
    }

    /// Reads config from environment variables.
    ///
    /// - `QDRANT_URL`      — endpoint (default `http://localhost:6334`)
    /// - `QDRANT_API_KEY`  — optional cloud key
    /// - `COLLECTION_NAME` — collection (default `math_arxiv_passages`)
    /// - `UPSERT_BATCH`    — batch size (default 128)
    pub fn from_env() -> Self {
        let mut cfg = Self::new_default(
            env_or("QDRANT_URL", "http://localhost:6334"),
            env_or("COLLECTION_NAME", "math_arxiv_passages"),
        );
        cfg.qdrant_api_key = std::env::var("QDRANT_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty());
        if let Some(batch) = std::env::var("UPSERT_BATCH")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            cfg.upsert_batch = batch;
        }
        cfg
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(StoreError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(StoreError::Config("collection is empty".into()));
        }
        if self.upsert_batch == 0 {
            return Err(StoreError::Config("upsert_batch must be > 0".into()));
        }
        Ok(())
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = StoreConfig::new_default("http://localhost:6334", "math_arxiv_passages");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_fields_are_rejected() {
        let mut cfg = StoreConfig::new_default("", "c");
        assert!(cfg.validate().is_err());

        cfg = StoreConfig::new_default("http://localhost:6334", "");
        assert!(cfg.validate().is_err());

        cfg = StoreConfig::new_default("http://localhost:6334", "c");
        cfg.upsert_batch = 0;
        assert!(cfg.validate().is_err());
    }
}
