//! Passage chunking for long-form content.
//!
//! Splits transcripts and blog text into paragraph-sized passages for
//! embedding and retrieval, without breaking sentences apart.

mod paragraph;
mod sentence_count;
mod sentences;

pub use paragraph::{chunk_text, ParagraphChunker};
pub use sentence_count::SentenceCountChunker;
pub use sentences::{normalize, split_sentences};

use serde::{Deserialize, Serialize};

/// Chunking strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChunkingStrategy {
    /// Character thresholds (min / ideal / max).
    Paragraph,
    /// Fixed sentences per paragraph with a soft ceiling.
    SentenceCount,
}

impl std::str::FromStr for ChunkingStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paragraph" | "chars" => Ok(ChunkingStrategy::Paragraph),
            "sentence-count" | "sentences" => Ok(ChunkingStrategy::SentenceCount),
            _ => Err(format!("Unknown chunking strategy: {}", s)),
        }
    }
}

/// Thresholds for paragraph chunking, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Paragraphs shorter than this are not closed early.
    pub min_chars: usize,
    /// Preferred closing length.
    pub ideal_chars: usize,
    /// Hard ceiling.
    pub max_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            min_chars: 200,
            ideal_chars: 800,
            max_chars: 1000,
        }
    }
}

/// Trait for passage chunking implementations.
pub trait Chunker: Send + Sync {
    /// Split text into ordered, non-empty passages.
    fn chunk(&self, text: &str) -> Vec<String>;
}

/// Create a chunker based on the strategy.
pub fn create_chunker(strategy: ChunkingStrategy, config: ChunkingConfig) -> Box<dyn Chunker> {
    match strategy {
        ChunkingStrategy::Paragraph => Box::new(ParagraphChunker::new(config)),
        ChunkingStrategy::SentenceCount => Box::new(SentenceCountChunker::new()),
    }
}
