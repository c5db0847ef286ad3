//! Character-threshold paragraph chunking.
//!
//! Sentences are packed greedily into paragraphs that aim for
//! `ideal_chars`, never start below `min_chars` unless the text runs out,
//! and never grow past `max_chars`.

use super::sentences::{normalize, split_oversized, split_sentences};
use super::{Chunker, ChunkingConfig};

/// Paragraph chunker driven by character thresholds.
#[derive(Debug, Clone, Default)]
pub struct ParagraphChunker {
    config: ChunkingConfig,
}

impl ParagraphChunker {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }
}

impl Chunker for ParagraphChunker {
    fn chunk(&self, text: &str) -> Vec<String> {
        chunk_text(text, &self.config)
    }
}

/// Paragraph under construction, with its length in characters.
#[derive(Default)]
struct Paragraph {
    text: String,
    chars: usize,
}

impl Paragraph {
    fn len_with(&self, sentence_chars: usize) -> usize {
        if self.text.is_empty() {
            sentence_chars
        } else {
            self.chars + 1 + sentence_chars
        }
    }

    fn push(&mut self, sentence: &str, sentence_chars: usize) {
        self.chars = self.len_with(sentence_chars);
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(sentence);
    }
}

/// Split text into paragraph-sized passages.
///
/// Returns an empty vec for empty or whitespace-only input. Every passage
/// is non-empty and at most `max_chars` characters long.
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Vec<String> {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return Vec::new();
    }

    let max = config.max_chars.max(1);
    let sentences: Vec<String> = split_sentences(&normalized)
        .iter()
        .flat_map(|s| split_oversized(s, max))
        .collect();

    let mut paragraphs: Vec<Paragraph> = Vec::new();
    let mut current = Paragraph::default();
    let last = sentences.len().saturating_sub(1);

    for (i, sentence) in sentences.iter().enumerate() {
        let sentence_chars = sentence.chars().count();

        if !current.text.is_empty() && current.len_with(sentence_chars) > max {
            paragraphs.push(std::mem::take(&mut current));
        }
        current.push(sentence, sentence_chars);

        if i == last || (current.chars >= config.ideal_chars && current.chars >= config.min_chars) {
            paragraphs.push(std::mem::take(&mut current));
        }
    }

    merge_short_tail(&mut paragraphs, config.min_chars, max);
    collapse_small_set(&mut paragraphs, max);

    paragraphs.into_iter().map(|p| p.text).collect()
}

/// Fold a final paragraph shorter than `min` into its predecessor if it fits.
fn merge_short_tail(paragraphs: &mut Vec<Paragraph>, min: usize, max: usize) {
    if paragraphs.len() < 2 {
        return;
    }
    let tail_chars = paragraphs[paragraphs.len() - 1].chars;
    let prev_chars = paragraphs[paragraphs.len() - 2].chars;
    if tail_chars >= min || prev_chars + 1 + tail_chars > max {
        return;
    }
    if let Some(tail) = paragraphs.pop() {
        if let Some(prev) = paragraphs.last_mut() {
            prev.push(&tail.text, tail.chars);
        }
    }
}

/// Join two or three paragraphs into one when together they still fit.
fn collapse_small_set(paragraphs: &mut Vec<Paragraph>, max: usize) {
    if !(2..=3).contains(&paragraphs.len()) {
        return;
    }
    let joined_chars =
        paragraphs.iter().map(|p| p.chars).sum::<usize>() + paragraphs.len() - 1;
    if joined_chars > max {
        return;
    }
    let mut merged = Paragraph::default();
    for p in paragraphs.drain(..) {
        merged.push(&p.text, p.chars);
    }
    paragraphs.push(merged);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(min: usize, ideal: usize, max: usize) -> ChunkingConfig {
        ChunkingConfig {
            min_chars: min,
            ideal_chars: ideal,
            max_chars: max,
        }
    }

    /// Deterministic pseudo-random texts with awkward spacing and punctuation.
    fn corpus() -> Vec<String> {
        let words = [
            "alpha", "beta", "gamma", "delta", "x", "3.5", "e.g", "end.Next",
            "supercalifragilisticexpialidocious-supercalifragilisticexpialidocious",
        ];
        let seps = [" ", " ", "  ", ". ", "! ", "? ", ".", "\n"];
        let mut state: u64 = 0x2545_F491_4F6C_DD1D;
        let mut next = |n: usize| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % n as u64) as usize
        };

        (0..300)
            .map(|_| {
                let len = next(90);
                let mut text = String::new();
                for _ in 0..len {
                    text.push_str(words[next(words.len())]);
                    text.push_str(seps[next(seps.len())]);
                }
                text
            })
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(chunk_text("", &ChunkingConfig::default()).is_empty());
        assert!(chunk_text("   \n\t ", &ChunkingConfig::default()).is_empty());
    }

    #[test]
    fn test_no_terminal_punctuation() {
        let passages = chunk_text("just some words without an ending", &ChunkingConfig::default());
        assert_eq!(passages, vec!["just some words without an ending."]);
    }

    #[test]
    fn test_short_input_is_single_passage() {
        let passages = chunk_text("Short text. Still short!", &ChunkingConfig::default());
        assert_eq!(passages, vec!["Short text. Still short!"]);
    }

    #[test]
    fn test_ten_sentence_example() {
        let text = "Hi there. I am fine. How are you? Let's talk more. The weather is nice today. \
                    We could go for a walk. Maybe we stop for coffee. Then we head back home. \
                    Dinner is at seven tonight. See you there!";
        let passages = chunk_text(text, &config(50, 120, 150));

        assert_eq!(passages.len(), 2);
        assert!(passages.iter().all(|p| p.chars().count() <= 150));
        assert!(passages[0].ends_with("Maybe we stop for coffee."));
        assert!(passages[1].ends_with("See you there!"));
    }

    #[test]
    fn test_sentence_that_would_overflow_starts_new_paragraph() {
        let a = "a".repeat(60) + ".";
        let b = "b".repeat(60) + ".";
        let text = format!("{} {}", a, b);
        // Joined length 123 exceeds max 100, ideal never reached by one sentence.
        let passages = chunk_text(&text, &config(10, 90, 100));
        assert_eq!(passages, vec![a, b]);
    }

    #[test]
    fn test_short_tail_merges_when_it_fits() {
        let text = format!("{}. {}. Tail.", "a".repeat(40), "b".repeat(40));
        // First paragraph closes at 83 chars (>= ideal 80); "Tail." is below min.
        let passages = chunk_text(&text, &config(20, 80, 200));
        assert_eq!(passages.len(), 1);
        assert!(passages[0].ends_with("Tail."));
    }

    #[test]
    fn test_short_tail_stays_when_merge_would_overflow() {
        let text = format!("{}. {}. Tail.", "a".repeat(33), "b".repeat(33));
        // First paragraph closes at 69 chars; adding "Tail." would make 75.
        let passages = chunk_text(&text, &config(20, 60, 70));
        assert_eq!(passages.len(), 2);
        assert_eq!(passages.last().map(String::as_str), Some("Tail."));
        assert!(passages.iter().all(|p| p.chars().count() <= 70));
    }

    #[test]
    fn test_small_sets_collapse() {
        // Three 30-char paragraphs that fit in one max-length paragraph.
        let text = format!("{}. {}. {}.", "a".repeat(29), "b".repeat(29), "c".repeat(29));
        let passages = chunk_text(&text, &config(10, 20, 100));
        assert_eq!(passages.len(), 1);
    }

    #[test]
    fn test_four_paragraphs_do_not_collapse() {
        let text = format!(
            "{}. {}. {}. {}.",
            "a".repeat(19),
            "b".repeat(19),
            "c".repeat(19),
            "d".repeat(19)
        );
        let passages = chunk_text(&text, &config(10, 15, 200));
        assert_eq!(passages.len(), 4);
    }

    #[test]
    fn test_properties_over_corpus() {
        for cfg in [config(50, 120, 150), config(200, 800, 1000), config(10, 20, 30)] {
            for text in corpus() {
                let passages = chunk_text(&text, &cfg);
                let normalized = normalize(&text);

                assert!(passages.iter().all(|p| !p.is_empty()));
                assert!(
                    passages.iter().all(|p| p.chars().count() <= cfg.max_chars),
                    "passage over max for {:?}",
                    text
                );

                // No sentence dropped or duplicated.
                let expected: Vec<String> = split_sentences(&normalized)
                    .iter()
                    .flat_map(|s| split_oversized(s, cfg.max_chars))
                    .collect();
                assert_eq!(passages.join(" "), expected.join(" "));

                // Re-chunking joined output keeps the same boundaries.
                assert_eq!(chunk_text(&passages.join(" "), &cfg), passages);

                if !normalized.is_empty() && normalized.chars().count() < cfg.min_chars {
                    assert_eq!(passages.len(), 1);
                }
            }
        }
    }
}
