//! Error types for Curator.

use thiserror::Error;

/// Library-level error type for Curator operations.
#[derive(Error, Debug)]
pub enum CuratorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Content library error: {0}")]
    Content(String),

    #[error("Namespace not found: {0}")]
    NamespaceNotFound(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Search failed: {0}")]
    Search(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Indexing failed: {0}")]
    Indexing(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: String, seconds: u64 },

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Coarse classification used by callers to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad request or missing configuration; retrying will not help.
    Input,
    /// Rate limiting, timeouts, missing namespaces; retry or fall back.
    Transient,
    /// The credential was rejected; the user must update it.
    Auth,
    /// Everything else.
    Permanent,
}

impl CuratorError {
    /// Classify this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CuratorError::Config(_)
            | CuratorError::InvalidInput(_)
            | CuratorError::MissingCredential(_) => ErrorCategory::Input,
            CuratorError::NamespaceNotFound(_)
            | CuratorError::RateLimited(_)
            | CuratorError::ServiceUnavailable(_)
            | CuratorError::Timeout { .. } => ErrorCategory::Transient,
            CuratorError::Auth(_) => ErrorCategory::Auth,
            CuratorError::Http(e) if e.is_timeout() || e.is_connect() => ErrorCategory::Transient,
            _ => ErrorCategory::Permanent,
        }
    }

    /// Whether this error signals rate limiting.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, CuratorError::RateLimited(_))
    }

    /// A message telling a person what to do about this error.
    pub fn user_hint(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Auth => "Check that your API key is valid and update it if it has expired.",
            ErrorCategory::Transient => "The service is busy or slow. Please try again in a moment.",
            ErrorCategory::Input => "Check the request and your configuration.",
            ErrorCategory::Permanent => "The request could not be completed.",
        }
    }
}

/// Result type alias for Curator operations.
pub type Result<T> = std::result::Result<T, CuratorError>;
