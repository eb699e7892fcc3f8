//! Fixed-size sliding-window chunking over whitespace-delimited words.
//!
//! Overlap exists specifically so that a sentence defining a term is not
//! split across two chunks without context on either side.

/// Splits `text` into overlapping word windows.
///
/// Window size is `target_words`, stride `target_words - overlap`. Every
/// chunk except possibly the last has exactly `target_words` words;
/// consecutive chunks share exactly `min(overlap, target_words)` words; the
/// window never produces an empty chunk, and the loop ends once a window
/// reaches the end of the word sequence.
pub fn chunk_text(text: &str, target_words: usize, overlap: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() || target_words == 0 {
        return Vec::new();
    }

    let step = target_words.saturating_sub(overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + target_words).min(words.len());
        chunks.push(words[start..end].join(" "));
        if end == words.len() {
            break;
        }
        start += step;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_sequence(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    fn expected_count(n: usize, w: usize, o: usize) -> usize {
        // ceil(max(1, n - o) / (w - o))
        let numerator = n.saturating_sub(o).max(1);
        numerator.div_ceil(w - o)
    }

    #[test]
    fn chunk_count_matches_formula() {
        for (n, w, o) in [
            (10, 4, 1),
            (200, 200, 40),
            (500, 200, 40),
            (201, 200, 40),
            (1, 200, 40),
            (39, 200, 40),
            (400, 100, 25),
        ] {
            let chunks = chunk_text(&word_sequence(n), w, o);
            assert_eq!(
                chunks.len(),
                expected_count(n, w, o),
                "count mismatch for n={n} w={w} o={o}"
            );
        }
    }

    #[test]
    fn every_chunk_but_the_last_has_target_words() {
        let chunks = chunk_text(&word_sequence(500), 200, 40);
        for chunk in &chunks[..chunks.len() - 1] {
            assert_eq!(chunk.split_whitespace().count(), 200);
        }
        assert!(chunks.last().unwrap().split_whitespace().count() <= 200);
    }

    #[test]
    fn consecutive_chunks_share_exactly_the_overlap() {
        let chunks = chunk_text(&word_sequence(500), 200, 40);
        for pair in chunks.windows(2) {
            let prev: Vec<&str> = pair[0].split_whitespace().collect();
            let next: Vec<&str> = pair[1].split_whitespace().collect();
            let shared = &prev[prev.len() - 40..];
            assert_eq!(shared, &next[..40]);
        }
    }

    #[test]
    fn unique_spans_reconstruct_the_original_sequence() {
        let original = word_sequence(457);
        let overlap = 40;
        let chunks = chunk_text(&original, 200, overlap);

        let mut rebuilt: Vec<String> = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            let words = chunk.split_whitespace().map(str::to_string);
            if i == 0 {
                rebuilt.extend(words);
            } else {
                rebuilt.extend(words.skip(overlap));
            }
        }
        assert_eq!(rebuilt.join(" "), original);
    }

    #[test]
    fn short_text_yields_one_whole_chunk() {
        let chunks = chunk_text("just five words right here", 200, 40);
        assert_eq!(chunks, vec!["just five words right here".to_string()]);
    }

    #[test]
    fn no_chunk_is_ever_empty() {
        for n in 1..50 {
            for (w, o) in [(4, 1), (5, 2), (7, 0)] {
                for chunk in chunk_text(&word_sequence(n), w, o) {
                    assert!(!chunk.is_empty());
                }
            }
        }
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("", 200, 40).is_empty());
        assert!(chunk_text("   \n\t ", 200, 40).is_empty());
    }
}
