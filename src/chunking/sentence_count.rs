//! Sentence-count chunking.
//!
//! Older policy kept for comparison: a fixed number of sentences per
//! paragraph with a soft character ceiling.

use super::sentences::{normalize, split_sentences};
use super::Chunker;

/// Sentences per paragraph.
pub const DEFAULT_SENTENCES_PER_PARAGRAPH: usize = 8;

/// Length at which a paragraph closes early.
pub const DEFAULT_SOFT_MAX_CHARS: usize = 500;

/// Groups a fixed number of sentences into each paragraph.
#[derive(Debug, Clone)]
pub struct SentenceCountChunker {
    sentences_per_paragraph: usize,
    soft_max_chars: usize,
}

impl SentenceCountChunker {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_SENTENCES_PER_PARAGRAPH, DEFAULT_SOFT_MAX_CHARS)
    }

    pub fn with_limits(sentences_per_paragraph: usize, soft_max_chars: usize) -> Self {
        Self {
            sentences_per_paragraph: sentences_per_paragraph.max(1),
            soft_max_chars,
        }
    }
}

impl Default for SentenceCountChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunker for SentenceCountChunker {
    fn chunk(&self, text: &str) -> Vec<String> {
        let normalized = normalize(text);
        let mut paragraphs = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut current_chars = 0;

        for sentence in split_sentences(&normalized) {
            current_chars += sentence.chars().count() + usize::from(!current.is_empty());
            current.push(sentence);

            if current.len() >= self.sentences_per_paragraph || current_chars >= self.soft_max_chars {
                paragraphs.push(current.join(" "));
                current.clear();
                current_chars = 0;
            }
        }

        if !current.is_empty() {
            paragraphs.push(current.join(" "));
        }
        paragraphs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_by_count() {
        let text = (1..=10).map(|i| format!("Sentence {}.", i)).collect::<Vec<_>>().join(" ");
        let chunker = SentenceCountChunker::new();
        let paragraphs = chunker.chunk(&text);

        assert_eq!(paragraphs.len(), 2);
        assert!(paragraphs[0].ends_with("Sentence 8."));
        assert_eq!(paragraphs[1], "Sentence 9. Sentence 10.");
    }

    #[test]
    fn test_soft_ceiling_closes_early() {
        let long = format!("{}.", "word ".repeat(30).trim_end());
        let text = format!("{} {} {}", long, long, long);
        let chunker = SentenceCountChunker::with_limits(8, 200);

        let paragraphs = chunker.chunk(&text);
        assert_eq!(paragraphs.len(), 2);
    }

    #[test]
    fn test_empty() {
        assert!(SentenceCountChunker::new().chunk("").is_empty());
    }
}
