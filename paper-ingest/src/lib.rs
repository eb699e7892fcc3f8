//! arXiv ingestion pipeline: download recent `math.AG`/`math.NT` papers,
//! parse their ar5iv HTML into sections, chunk with overlap, filter
//! boilerplate, embed, and upsert into the passage store.
//!
//! This crate owns the Document→Passage transformation and is the only
//! write path into the vector store; the query side only reads.

mod arxiv;
mod chunk;
mod errors;
mod filter;
mod html;
mod ingest;

pub use arxiv::list_recent_arxiv_ids;
pub use chunk::chunk_text;
pub use errors::IngestError;
pub use filter::{BAD_SNIPPETS, JunkFilter};
pub use html::{AR5IV_BASE, MATH_MARK, Section, fetch_ar5iv_html, html_to_sections, normalize_whitespace};
pub use ingest::{IngestConfig, run_ingest};
