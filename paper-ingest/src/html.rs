//! Fetch ar5iv HTML and segment it into titled sections.
//!
//! Heuristics: `h2`/`h3` headers define section boundaries; inline `<math>`
//! markup is replaced by a neutral marker instead of deleted so the
//! surrounding sentence structure survives sentence-splitting and
//! embedding.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::errors::IngestError;

/// Base URL of the ar5iv HTML rendering service.
pub const AR5IV_BASE: &str = "https://ar5iv.org/html/";

/// Neutral marker substituted for inline `<math>` blocks.
pub const MATH_MARK: &str = " [MATH] ";

const USER_AGENT: &str = "math-arxiv-bot/0.1";

static MATH_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<math\b.*?</math>").expect("valid math-tag regex"));
static HEADER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2, h3").expect("valid header selector"));
static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("valid body selector"));

/// One titled slice of a document, in document order.
#[derive(Clone, Debug)]
pub struct Section {
    pub title: String,
    pub body: String,
}

/// Builds the HTTP client used for document fetching.
///
/// # Errors
/// Returns `IngestError::Http` if the client cannot be constructed.
pub fn http_client() -> Result<Client, IngestError> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .build()?)
}

/// Fetches the ar5iv HTML rendering of one arXiv paper.
///
/// # Errors
/// Returns `IngestError::Http` on transport failures or non-2xx statuses.
pub async fn fetch_ar5iv_html(client: &Client, arxiv_id: &str) -> Result<String, IngestError> {
    let url = format!("{AR5IV_BASE}{arxiv_id}");
    debug!("GET {url}");
    let resp = client.get(&url).send().await?.error_for_status()?;
    Ok(resp.text().await?)
}

/// Segments HTML into `(title, body)` sections along `h2`/`h3` boundaries.
///
/// Text between a header and the next header (at either level) belongs to
/// that header's section. Falls back to one `"Body"` section when no
/// headers exist. `<math>` blocks become [`MATH_MARK`] so tokenisation
/// stays stable; whitespace runs collapse to single spaces.
pub fn html_to_sections(html: &str) -> Vec<Section> {
    let html = MATH_TAG_RE.replace_all(html, MATH_MARK);
    let doc = Html::parse_document(&html);

    let mut sections = Vec::new();
    for header in doc.select(&HEADER_SELECTOR) {
        let title = normalize_whitespace(&header.text().collect::<Vec<_>>().join(" "));

        // Collect sibling text until the next header at either level.
        let mut parts: Vec<String> = Vec::new();
        for sib in header.next_siblings() {
            if let Some(el) = sib.value().as_element() {
                if matches!(el.name(), "h2" | "h3") {
                    break;
                }
            }
            if let Some(el) = ElementRef::wrap(sib) {
                parts.push(el.text().collect::<Vec<_>>().join(" "));
            } else if let Some(t) = sib.value().as_text() {
                parts.push(t.to_string());
            }
        }

        let body = normalize_whitespace(&parts.join(" "));
        if !body.is_empty() {
            sections.push(Section { title, body });
        }
    }

    if doc.select(&HEADER_SELECTOR).next().is_none() {
        let raw = doc
            .select(&BODY_SELECTOR)
            .next()
            .map(|b| b.text().collect::<Vec<_>>().join(" "))
            .unwrap_or_else(|| doc.root_element().text().collect::<Vec<_>>().join(" "));
        sections = vec![Section {
            title: "Body".to_string(),
            body: normalize_whitespace(&raw),
        }];
    }

    sections
}

/// Collapses every whitespace run to a single space and trims the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"<html><body>
        <h2>Introduction</h2>
        <p>First    paragraph with <math><mi>x</mi><mo>=</mo><mi>y</mi></math> inline.</p>
        <p>Second paragraph.</p>
        <h3>Lemma 1</h3>
        <p>A lemma body.</p>
        <h2>Results</h2>
        <p>Results body.</p>
    </body></html>"#;

    #[test]
    fn sections_follow_h2_and_h3_boundaries() {
        let sections = html_to_sections(FIXTURE);
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Introduction", "Lemma 1", "Results"]);
        assert!(sections[0].body.contains("Second paragraph."));
        assert!(!sections[0].body.contains("lemma"));
        assert_eq!(sections[1].body, "A lemma body.");
        assert_eq!(sections[2].body, "Results body.");
    }

    #[test]
    fn math_markup_becomes_a_neutral_marker() {
        let sections = html_to_sections(FIXTURE);
        assert!(sections[0].body.contains("[MATH]"));
        assert!(!sections[0].body.contains("<math"));
        // The marker keeps the sentence connected on both sides.
        assert!(sections[0].body.contains("with [MATH] inline."));
    }

    #[test]
    fn whitespace_runs_collapse_to_single_spaces() {
        let sections = html_to_sections(FIXTURE);
        assert!(sections[0].body.starts_with("First paragraph"));
        assert!(!sections[0].body.contains("  "));
    }

    #[test]
    fn missing_headers_fall_back_to_one_body_section() {
        let html = "<html><body><p>Just some text without structure.</p></body></html>";
        let sections = html_to_sections(html);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Body");
        assert_eq!(sections[0].body, "Just some text without structure.");
    }

    #[test]
    fn empty_bodied_sections_are_dropped() {
        let html = "<html><body><h2>Ghost</h2><h2>Real</h2><p>Content.</p></body></html>";
        let sections = html_to_sections(html);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Real");
    }
}
