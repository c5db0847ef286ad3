//! Configuration settings for Curator.

use crate::chunking::{ChunkingConfig, ChunkingStrategy};
use crate::vector_index::DEFAULT_NAMESPACE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub content: ContentSettings,
    pub chunking: ChunkingSettings,
    pub embedding: EmbeddingSettings,
    pub vector_index: VectorIndexSettings,
    pub indexing: IndexingSettings,
    pub rag: RagSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.curator".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Where the local content library lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSettings {
    /// JSON file with `videos` and `posts` arrays. Relative paths resolve
    /// against `general.data_dir`.
    pub library_path: String,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            library_path: "library.json".to_string(),
        }
    }
}

/// Passage chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Chunking strategy (paragraph, sentence-count).
    pub strategy: String,
    /// Shortest paragraph worth emitting on its own, in characters.
    pub min_chars: usize,
    /// Preferred paragraph length, in characters.
    pub ideal_chars: usize,
    /// Hard ceiling on paragraph length, in characters.
    pub max_chars: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        let config = ChunkingConfig::default();
        Self {
            strategy: "paragraph".to_string(),
            min_chars: config.min_chars,
            ideal_chars: config.ideal_chars,
            max_chars: config.max_chars,
        }
    }
}

impl ChunkingSettings {
    /// Chunking thresholds as a config value.
    pub fn config(&self) -> ChunkingConfig {
        ChunkingConfig {
            min_chars: self.min_chars,
            ideal_chars: self.ideal_chars,
            max_chars: self.max_chars,
        }
    }

    /// Parsed strategy, falling back to the paragraph policy.
    pub fn strategy(&self) -> ChunkingStrategy {
        self.strategy.parse().unwrap_or(ChunkingStrategy::Paragraph)
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
        }
    }
}

/// Vector index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorIndexSettings {
    /// Vector index provider (pinecone, memory).
    pub provider: String,
    /// Index host, e.g. `https://my-index-abc123.svc.us-east1-gcp.pinecone.io`.
    pub host: Option<String>,
    /// Environment variable holding the index API key.
    pub api_key_env: String,
    /// Namespace queried and written by default.
    pub namespace: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for VectorIndexSettings {
    fn default() -> Self {
        Self {
            provider: "pinecone".to_string(),
            host: None,
            api_key_env: "PINECONE_API_KEY".to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Batch indexing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexingSettings {
    /// Records per upsert call.
    pub batch_size: usize,
    /// Pause between batches in milliseconds.
    pub batch_delay_ms: u64,
    /// Retries per batch on rate limiting. At most
    /// [`MAX_BACKOFF_RETRIES`](crate::indexing::MAX_BACKOFF_RETRIES); past
    /// that the backoff delay stops growing.
    pub max_retries: u32,
    /// First backoff delay in milliseconds; doubles per retry.
    pub initial_backoff_ms: u64,
}

impl Default for IndexingSettings {
    fn default() -> Self {
        Self {
            batch_size: 20,
            batch_delay_ms: 1000,
            max_retries: 5,
            initial_backoff_ms: 2000,
        }
    }
}

impl IndexingSettings {
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }
}

/// RAG (Retrieval-Augmented Generation) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// LLM model for response generation.
    pub model: String,
    /// Sampling temperature for generation (0.0 - 2.0).
    pub temperature: f32,
    /// Number of passages retrieved per query.
    pub top_k: usize,
    /// Timeout for a single vector search, in seconds.
    pub search_timeout_secs: u64,
    /// Timeout for a single generation call, in seconds.
    pub generation_timeout_secs: u64,
    /// Fall back to local embedding search when the index fails.
    pub embedding_fallback: bool,
    /// Fall back to term matching over the local library.
    pub local_fallback: bool,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            top_k: 5,
            search_timeout_secs: 20,
            generation_timeout_secs: 60,
            embedding_fallback: false,
            local_fallback: true,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            settings.validate()?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Reject threshold combinations the chunker cannot honour.
    pub fn validate(&self) -> crate::error::Result<()> {
        let c = &self.chunking;
        if c.max_chars == 0 || c.min_chars > c.max_chars || c.ideal_chars > c.max_chars {
            return Err(crate::error::CuratorError::Config(format!(
                "chunking thresholds must satisfy min <= max and ideal <= max (got min={}, ideal={}, max={})",
                c.min_chars, c.ideal_chars, c.max_chars
            )));
        }
        if self.indexing.batch_size == 0 {
            return Err(crate::error::CuratorError::Config(
                "indexing.batch_size must be at least 1".to_string(),
            ));
        }
        if self.indexing.max_retries > crate::indexing::MAX_BACKOFF_RETRIES {
            return Err(crate::error::CuratorError::Config(format!(
                "indexing.max_retries must be at most {} (got {})",
                crate::indexing::MAX_BACKOFF_RETRIES,
                self.indexing.max_retries
            )));
        }
        if !(0.0..=2.0).contains(&self.rag.temperature) {
            return Err(crate::error::CuratorError::Config(format!(
                "rag.temperature must be between 0.0 and 2.0 (got {})",
                self.rag.temperature
            )));
        }
        if self.rag.top_k == 0 {
            return Err(crate::error::CuratorError::Config(
                "rag.top_k must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::CuratorError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("curator")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the content library path, resolved against the data directory.
    pub fn library_path(&self) -> PathBuf {
        let path = Self::expand_path(&self.content.library_path);
        if path.is_absolute() {
            path
        } else {
            self.data_dir().join(path)
        }
    }
}
