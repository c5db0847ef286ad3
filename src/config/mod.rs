//! Configuration module for Curator.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, RagPrompts};
pub use settings::{
    ChunkingSettings, ContentSettings, EmbeddingSettings, GeneralSettings, IndexingSettings,
    PromptSettings, RagSettings, Settings, VectorIndexSettings,
};
