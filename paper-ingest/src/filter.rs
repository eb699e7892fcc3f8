//! Junk filtering for chunks, run after chunking and before embedding.
//!
//! A pure predicate with no side effects; ordering it before embedding
//! avoids wasting embedding calls on navigation widgets and glyph noise.

/// Known ar5iv UI fragments that mark a chunk as non-content.
pub const BAD_SNIPPETS: [&str; 5] = [
    "View a PDF",          // ar5iv header
    "HTML (experimental)", // ar5iv header
    "Access Paper",        // ar5iv header
    "BibTeX",              // citation widget
    "×",                   // close button glyph
];

/// Heuristic chunk filter with tunable thresholds.
///
/// The thresholds were tuned empirically against ar5iv output; they are
/// configuration, not law.
#[derive(Clone, Copy, Debug)]
pub struct JunkFilter {
    /// Minimum character count; anything shorter is UI noise.
    pub min_chars: usize,
    /// Minimum share of alphabetic characters; catches symbol/glyph noise.
    pub min_alpha_ratio: f64,
}

impl Default for JunkFilter {
    fn default() -> Self {
        Self {
            min_chars: 50,
            min_alpha_ratio: 0.3,
        }
    }
}

impl JunkFilter {
    /// True if the chunk is clearly not paper content.
    pub fn is_junk(&self, text: &str) -> bool {
        let t = text.trim();
        if t.is_empty() {
            return true;
        }
        let total = t.chars().count();
        // Drop very short UI strings.
        if total < self.min_chars {
            return true;
        }
        // Drop known ar5iv UI bits.
        if BAD_SNIPPETS.iter().any(|b| t.contains(b)) {
            return true;
        }
        // Mostly punctuation / symbols?
        let letters = t.chars().filter(|c| c.is_alphabetic()).count();
        if (letters as f64) < self.min_alpha_ratio * (total as f64) {
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_whitespace_are_junk() {
        let f = JunkFilter::default();
        assert!(f.is_junk(""));
        assert!(f.is_junk("   \t\n"));
    }

    #[test]
    fn short_strings_are_always_rejected() {
        let f = JunkFilter::default();
        assert!(f.is_junk("Theorem 1.2 holds."));
        assert!(f.is_junk(&"a".repeat(49)));
    }

    #[test]
    fn boilerplate_substrings_are_always_rejected() {
        let f = JunkFilter::default();
        let padding = "perfectly reasonable mathematical prose around it ";
        for bad in BAD_SNIPPETS {
            let text = format!("{padding}{bad}{padding}");
            assert!(f.is_junk(&text), "should reject text containing {bad:?}");
        }
    }

    #[test]
    fn symbol_heavy_strings_are_rejected() {
        let f = JunkFilter::default();
        // 75% non-alphabetic characters.
        let text = format!("{}{}", "abcde".repeat(5), "+=#/ ".repeat(15));
        assert!(f.is_junk(&text));
    }

    #[test]
    fn a_well_formed_sentence_is_accepted() {
        let f = JunkFilter::default();
        let words: Vec<String> = (0..100).map(|i| format!("word{i}")).collect();
        let text = words.join(" ");
        assert!(!f.is_junk(&text));
    }

    #[test]
    fn thresholds_are_configurable() {
        let lax = JunkFilter {
            min_chars: 5,
            min_alpha_ratio: 0.1,
        };
        assert!(!lax.is_junk("Theorem 1.2 holds."));
    }
}
