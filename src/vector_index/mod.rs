//! Vector index abstraction for Curator.
//!
//! The index stores passages and ranks them against query text. Hosted
//! indexes embed text themselves, so the trait speaks in text, not vectors.

mod memory;
mod pinecone;

pub use memory::MemoryVectorIndex;
pub use pinecone::PineconeIndex;

use crate::content::ContentType;
use crate::error::{CuratorError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Namespace queried when none is given.
pub const DEFAULT_NAMESPACE: &str = "content-library";

/// Placeholder text stored for passages without content.
pub const NO_CONTENT_SENTINEL: &str = "No content available";

/// A passage ready to be written to the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassageRecord {
    /// Stable record id; re-upserting the same id overwrites.
    pub id: String,
    pub text: String,
    pub title: String,
    pub url: String,
    pub content_type: ContentType,
}

/// A ranked passage returned by a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub content_type: ContentType,
    /// Similarity score (higher is better).
    pub score: f32,
    /// Passage text, if the index returned one.
    pub text: Option<String>,
}

impl SearchResult {
    /// Whether the text is missing and must be backfilled.
    pub fn needs_backfill(&self) -> bool {
        match self.text.as_deref() {
            None => true,
            Some(text) => text.trim().is_empty() || text == NO_CONTENT_SENTINEL,
        }
    }

    /// Passage text, or the sentinel when it is missing.
    pub fn text_or_sentinel(&self) -> &str {
        self.text.as_deref().unwrap_or(NO_CONTENT_SENTINEL)
    }
}

impl From<&PassageRecord> for SearchResult {
    fn from(record: &PassageRecord) -> Self {
        Self {
            title: record.title.clone(),
            url: record.url.clone(),
            content_type: record.content_type,
            score: 0.0,
            text: Some(record.text.clone()),
        }
    }
}

/// Trait for vector index implementations.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    /// Top `top_k` passages for `query` in `namespace`, best first.
    ///
    /// Returns [`CuratorError::NamespaceNotFound`] when the namespace does not exist.
    async fn search(&self, query: &str, top_k: usize, namespace: &str) -> Result<Vec<SearchResult>>;

    /// Insert or overwrite records in `namespace`.
    async fn upsert(&self, records: &[PassageRecord], namespace: &str) -> Result<()>;
}

/// Search `namespace`, retrying once against the unnamed namespace when the
/// default one does not exist.
#[instrument(skip(index), fields(provider = index.name()))]
pub async fn search_with_fallback(
    index: &dyn VectorIndex,
    query: &str,
    top_k: usize,
    namespace: &str,
) -> Result<Vec<SearchResult>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CuratorError::InvalidInput("query must not be empty".to_string()));
    }
    if top_k == 0 {
        return Err(CuratorError::InvalidInput("top_k must be at least 1".to_string()));
    }

    let mut results = match index.search(query, top_k, namespace).await {
        Err(CuratorError::NamespaceNotFound(ns)) if namespace == DEFAULT_NAMESPACE => {
            info!("Namespace '{}' not found, retrying in the unnamed namespace", ns);
            index.search(query, top_k, "").await?
        }
        other => other?,
    };

    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(top_k);
    debug!("Search returned {} results", results.len());
    Ok(results)
}
