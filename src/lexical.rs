//! Term-overlap scoring for in-process search.
//!
//! Used where no embedding is available: the memory vector index and the
//! local content fallback.

use std::collections::HashSet;

/// Terms shorter than this are ignored.
const MIN_TERM_CHARS: usize = 3;

/// Lowercased alphanumeric terms of `text`, deduplicated.
pub fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TERM_CHARS)
        .map(str::to_lowercase)
        .collect()
}

/// Fraction of query terms that appear in `text`, in `0.0..=1.0`.
pub fn score(query: &str, text: &str) -> f32 {
    let query_terms = terms(query);
    if query_terms.is_empty() {
        return 0.0;
    }
    let text_terms = terms(text);
    let hits = query_terms.iter().filter(|t| text_terms.contains(*t)).count();
    hits as f32 / query_terms.len() as f32
}
