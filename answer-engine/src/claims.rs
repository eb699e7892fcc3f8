//! Turn retrieved passages into short, citable claims WITHOUT an LLM.
//!
//! A claim is a verbatim (whitespace-normalized) prefix-sentence extract of
//! its source passage — never a paraphrase — so every downstream statement
//! can be audited against the stored text.

use std::collections::HashSet;

use passage_store::ScoredPassage;
use serde::{Deserialize, Serialize};

/// An atomic, citable statement tagged with its provenance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub claim: String,
    pub arxiv_id: String,
    pub section: String,
}

/// Splits text on `.`/`?`/`!` followed by whitespace and returns up to
/// `max_sents` non-empty fragments.
///
/// A text with no sentence-ending punctuation yields the whole trimmed
/// text as its single fragment.
pub fn first_sentences(text: &str, max_sents: usize) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() || max_sents == 0 {
        return Vec::new();
    }

    let mut parts: Vec<String> = Vec::new();
    let mut start = 0;
    let mut chars = trimmed.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        let at_boundary = matches!(ch, '.' | '?' | '!')
            && chars.peek().is_some_and(|&(_, next)| next.is_whitespace());
        if at_boundary {
            let fragment = trimmed[start..=i].trim();
            if !fragment.is_empty() {
                parts.push(fragment.to_string());
                if parts.len() == max_sents {
                    return parts;
                }
            }
            start = i + ch.len_utf8();
        }
    }

    let tail = trimmed[start..].trim();
    if !tail.is_empty() {
        parts.push(tail.to_string());
    }
    parts.truncate(max_sents);
    parts
}

/// Builds atomic, citable claims from the top passages:
/// - take the first 1–2 sentences from each passage, in passage order;
/// - trim and de-duplicate globally on `(claim, arxiv_id, section)`,
///   first occurrence wins;
/// - stop the scan the moment `max_claims` is reached, even mid-passage.
///
/// The early exit matters: which claims survive under a low limit depends
/// on it, versus a "run then truncate" approach.
pub fn extract_claims(passages: &[ScoredPassage], max_claims: usize) -> Vec<Claim> {
    let mut claims: Vec<Claim> = Vec::new();
    let mut seen: HashSet<(String, String, String)> = HashSet::new();

    for p in passages {
        for sent in first_sentences(&p.text, 2) {
            let claim = sent.trim().to_string();
            if claim.is_empty() {
                continue;
            }
            let key = (claim.clone(), p.arxiv_id.clone(), p.section.clone());
            if !seen.insert(key) {
                continue;
            }
            claims.push(Claim {
                claim,
                arxiv_id: p.arxiv_id.clone(),
                section: p.section.clone(),
            });
            if claims.len() >= max_claims {
                return claims;
            }
        }
    }
    claims
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passage(text: &str, arxiv_id: &str, section: &str) -> ScoredPassage {
        ScoredPassage {
            score: 0.9,
            text: text.to_string(),
            arxiv_id: arxiv_id.to_string(),
            section: section.to_string(),
            source_html: format!("https://ar5iv.org/html/{arxiv_id}"),
        }
    }

    #[test]
    fn neron_severi_scenario_yields_two_tagged_claims() {
        let p = passage(
            "The Néron–Severi group is finitely generated. It measures divisors modulo algebraic equivalence.",
            "2508.00001",
            "Background",
        );
        let claims = extract_claims(&[p], 8);
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[0].claim, "The Néron–Severi group is finitely generated.");
        assert_eq!(
            claims[1].claim,
            "It measures divisors modulo algebraic equivalence."
        );
        for c in &claims {
            assert_eq!(c.arxiv_id, "2508.00001");
            assert_eq!(c.section, "Background");
        }
    }

    #[test]
    fn splitting_respects_question_and_exclamation_marks() {
        let parts = first_sentences("Is it flat? It is! Extra trailing text", 3);
        assert_eq!(
            parts,
            vec!["Is it flat?", "It is!", "Extra trailing text"]
        );
    }

    #[test]
    fn text_without_punctuation_becomes_one_claim() {
        let parts = first_sentences("  a single unpunctuated fragment  ", 2);
        assert_eq!(parts, vec!["a single unpunctuated fragment"]);
    }

    #[test]
    fn abbreviation_like_periods_without_whitespace_do_not_split() {
        // "3.1" has no whitespace after the dot; it must stay intact.
        let parts = first_sentences("See Lemma 3.1 for details. Next sentence.", 2);
        assert_eq!(
            parts,
            vec!["See Lemma 3.1 for details.", "Next sentence."]
        );
    }

    #[test]
    fn at_most_two_sentences_per_passage() {
        let p = passage("One. Two. Three. Four.", "2508.00001", "Intro");
        let claims = extract_claims(&[p], 8);
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[0].claim, "One.");
        assert_eq!(claims[1].claim, "Two.");
    }

    #[test]
    fn max_claims_exits_early_mid_passage() {
        let passages = vec![
            passage("A one. A two.", "2508.00001", "S1"),
            passage("B one. B two.", "2508.00002", "S2"),
        ];
        let claims = extract_claims(&passages, 3);
        assert_eq!(claims.len(), 3);
        assert_eq!(claims[2].claim, "B one.");
    }

    #[test]
    fn duplicates_are_dropped_globally_first_occurrence_wins() {
        let passages = vec![
            passage("Shared sentence here. Unique one.", "2508.00001", "S"),
            passage("Shared sentence here. Different tail.", "2508.00001", "S"),
        ];
        let claims = extract_claims(&passages, 8);
        let texts: Vec<&str> = claims.iter().map(|c| c.claim.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Shared sentence here.", "Unique one.", "Different tail."]
        );
    }

    #[test]
    fn same_text_from_different_sources_is_kept() {
        // The dedup key includes provenance, not just the text.
        let passages = vec![
            passage("Shared sentence here.", "2508.00001", "S"),
            passage("Shared sentence here.", "2508.00002", "S"),
        ];
        let claims = extract_claims(&passages, 8);
        assert_eq!(claims.len(), 2);
    }

    #[test]
    fn claims_are_substrings_of_their_source_passage() {
        let text = "The Picard scheme exists for projective varieties. Its tangent space is H1.";
        let p = passage(text, "2508.00003", "Prelim");
        for c in extract_claims(&[p], 8) {
            assert!(text.contains(&c.claim));
        }
    }

    #[test]
    fn empty_passages_yield_no_claims() {
        let p = passage("   ", "2508.00001", "S");
        assert!(extract_claims(&[p], 8).is_empty());
        assert!(extract_claims(&[], 8).is_empty());
    }
}
