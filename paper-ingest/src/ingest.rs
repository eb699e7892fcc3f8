//! End-to-end ingestion pipeline: fetch → segment → chunk → filter → embed
//! → upsert into Qdrant.
//!
//! Documents are processed one at a time with per-document failure
//! isolation: an error while processing one paper is logged with its arXiv
//! id and the loop continues — a single bad document never aborts the
//! batch.

use std::time::Duration;

use embedder::EmbeddingProvider;
use indicatif::{ProgressBar, ProgressStyle};
use passage_store::{PassagePoint, PassageStore};
use reqwest::Client;
use tracing::{info, warn};

use crate::arxiv::list_recent_arxiv_ids;
use crate::chunk::chunk_text;
use crate::errors::IngestError;
use crate::filter::JunkFilter;
use crate::html::{AR5IV_BASE, fetch_ar5iv_html, html_to_sections, http_client};

/// Tunables for one ingestion run.
#[derive(Clone, Debug)]
pub struct IngestConfig {
    /// How many recent arXiv ids to request.
    pub max_results: usize,
    /// Sliding-window size in words.
    pub target_words: usize,
    /// Word overlap between consecutive chunks.
    pub overlap_words: usize,
    /// Courtesy delay between documents; not a correctness requirement.
    pub inter_document_delay: Duration,
    /// Chunk-level junk filter.
    pub filter: JunkFilter,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_results: 30,
            target_words: 200,
            overlap_words: 40,
            inter_document_delay: Duration::from_millis(400),
            filter: JunkFilter::default(),
        }
    }
}

impl IngestConfig {
    /// Reads optional overrides from environment variables
    /// (`MAX_RESULTS`, `CHUNK_TARGET_WORDS`, `CHUNK_OVERLAP_WORDS`).
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(v) = env_parse("MAX_RESULTS") {
            cfg.max_results = v;
        }
        if let Some(v) = env_parse("CHUNK_TARGET_WORDS") {
            cfg.target_words = v;
        }
        if let Some(v) = env_parse("CHUNK_OVERLAP_WORDS") {
            cfg.overlap_words = v;
        }
        cfg
    }
}

/// Runs a full corpus ingestion: recreates the collection for the
/// provider's dimensionality, then fetches, segments, embeds, and upserts
/// recent papers one by one.
///
/// Returns the total number of passages stored.
///
/// # Errors
/// Only setup failures (collection re-creation, id listing) abort the run;
/// per-document failures are logged and skipped.
pub async fn run_ingest(
    cfg: &IngestConfig,
    store: &PassageStore,
    provider: &dyn EmbeddingProvider,
) -> Result<u64, IngestError> {
    let client = http_client()?;

    store.recreate_collection(provider.dim()).await?;

    let ids = list_recent_arxiv_ids(&client, cfg.max_results).await?;
    info!(
        "Ingesting {} arXiv documents into '{}'",
        ids.len(),
        store.collection()
    );

    let pb = ProgressBar::new(ids.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
        )
        .unwrap()
        .progress_chars("##-"),
    );

    let mut total: u64 = 0;
    for aid in &ids {
        match ingest_document(cfg, store, provider, &client, aid).await {
            Ok(0) => info!("No text chunks for {aid}; skipping"),
            Ok(n) => {
                total += n;
                info!("Indexed {aid} with {n} chunks");
            }
            Err(e) => warn!("Skip {aid} -> {e}"),
        }
        pb.inc(1);
        tokio::time::sleep(cfg.inter_document_delay).await;
    }

    pb.finish_with_message("Ingestion complete");
    info!("Ingested {} passages total", total);
    Ok(total)
}

/// Processes one paper: fetch, segment, chunk, filter, embed, upsert.
///
/// Returns the number of passages stored for this paper (0 when every
/// chunk was filtered out).
async fn ingest_document(
    cfg: &IngestConfig,
    store: &PassageStore,
    provider: &dyn EmbeddingProvider,
    client: &Client,
    arxiv_id: &str,
) -> Result<u64, IngestError> {
    let html = fetch_ar5iv_html(client, arxiv_id).await?;
    let sections = html_to_sections(&html);

    let mut texts: Vec<String> = Vec::new();
    let mut titles: Vec<String> = Vec::new();
    for section in &sections {
        for chunk in chunk_text(&section.body, cfg.target_words, cfg.overlap_words) {
            // Clean and filter BEFORE embedding.
            if cfg.filter.is_junk(&chunk) {
                continue;
            }
            titles.push(section.title.clone());
            texts.push(chunk);
        }
    }

    if texts.is_empty() {
        return Ok(0);
    }

    let vectors = provider.embed_documents(&texts).await?;
    let source = format!("{AR5IV_BASE}{arxiv_id}");
    let passages: Vec<PassagePoint> = titles
        .into_iter()
        .zip(texts)
        .zip(vectors)
        .map(|((section, text), vector)| PassagePoint {
            arxiv_id: arxiv_id.to_string(),
            section,
            source_html: source.clone(),
            text,
            vector,
        })
        .collect();

    Ok(store.upsert_passages(&passages, provider.dim()).await?)
}

fn env_parse(name: &str) -> Option<usize> {
    std::env::var(name).ok().and_then(|v| v.parse::<usize>().ok())
}
