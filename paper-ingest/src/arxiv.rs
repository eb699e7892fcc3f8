//! Listing recent paper ids through the arXiv Atom API.

use std::collections::HashSet;

use reqwest::Client;
use tracing::debug;

use crate::errors::IngestError;

const ARXIV_API: &str = "http://export.arxiv.org/api/query";

/// Fetches recent ids for `math.AG` and `math.NT`, newest first.
///
/// # Errors
/// Returns `IngestError::Http` on transport failures or non-2xx statuses.
pub async fn list_recent_arxiv_ids(
    client: &Client,
    max_results: usize,
) -> Result<Vec<String>, IngestError> {
    let url = format!(
        "{ARXIV_API}?search_query=cat:math.AG+OR+cat:math.NT&\
         sortBy=submittedDate&sortOrder=descending&start=0&\
         max_results={max_results}"
    );
    debug!("GET {url}");
    let body = client.get(&url).send().await?.error_for_status()?.text().await?;
    Ok(parse_atom_ids(&body))
}

/// Extracts arXiv ids from an Atom feed, de-duplicated preserving order.
///
/// The feed embeds ids as `<id>http://arxiv.org/abs/<id></id>` lines; a
/// full XML parse is not needed for that shape.
fn parse_atom_ids(atom: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for line in atom.lines() {
        if !line.contains("<id>http://arxiv.org/abs") {
            continue;
        }
        let Some(rest) = line.split("/abs/").last() else {
            continue;
        };
        let id = rest.split("</id>").next().unwrap_or("").trim();
        if !id.is_empty() && seen.insert(id.to_string()) {
            out.push(id.to_string());
        }
    }
    out
}
