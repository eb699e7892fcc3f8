//! One-shot corpus ingestion: download recent arXiv `math.AG`/`math.NT`
//! papers, segment, chunk, embed, and upsert into Qdrant.
//!
//! The collection is re-created for the configured embedding backend's
//! dimensionality, so switching backends requires (and gets) a full
//! re-ingest.

use std::error::Error;

use paper_ingest::{IngestConfig, run_ingest};
use passage_store::{PassageStore, StoreConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from a .env file when present.
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = PassageStore::new(StoreConfig::from_env())?;
    let provider = embedder::provider_from_env()?;
    let cfg = IngestConfig::from_env();

    let total = run_ingest(&cfg, &store, provider.as_ref()).await?;
    info!("done: {total} passages stored in '{}'", store.collection());

    Ok(())
}
