//! In-memory vector index implementation.
//!
//! Ranks by term overlap instead of embeddings. Useful for testing, offline
//! use and small libraries.

use super::{PassageRecord, SearchResult, VectorIndex};
use crate::error::{CuratorError, Result};
use crate::lexical;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

type Namespaces = HashMap<String, HashMap<String, PassageRecord>>;

/// In-memory vector index partitioned by namespace.
pub struct MemoryVectorIndex {
    namespaces: RwLock<Namespaces>,
}

impl MemoryVectorIndex {
    /// Create a new, empty index.
    pub fn new() -> Self {
        Self {
            namespaces: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Namespaces> {
        self.namespaces.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Namespaces> {
        self.namespaces.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of records in `namespace`.
    pub fn record_count(&self, namespace: &str) -> usize {
        self.read().get(namespace).map_or(0, HashMap::len)
    }
}

impl Default for MemoryVectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorIndex for MemoryVectorIndex {
    fn name(&self) -> &str {
        "memory"
    }

    async fn search(&self, query: &str, top_k: usize, namespace: &str) -> Result<Vec<SearchResult>> {
        let namespaces = self.read();
        let records = namespaces
            .get(namespace)
            .ok_or_else(|| CuratorError::NamespaceNotFound(namespace.to_string()))?;

        let mut results: Vec<SearchResult> = records
            .values()
            .filter_map(|record| {
                let score = lexical::score(query, &format!("{} {}", record.title, record.text));
                (score > 0.0).then(|| SearchResult {
                    score,
                    ..SearchResult::from(record)
                })
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.url.cmp(&b.url))
        });
        results.truncate(top_k);

        Ok(results)
    }

    async fn upsert(&self, records: &[PassageRecord], namespace: &str) -> Result<()> {
        let mut namespaces = self.write();
        let store = namespaces.entry(namespace.to_string()).or_default();
        for record in records {
            store.insert(record.id.clone(), record.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentType;
    use crate::vector_index::{search_with_fallback, DEFAULT_NAMESPACE};

    fn record(id: &str, text: &str) -> PassageRecord {
        PassageRecord {
            id: id.to_string(),
            text: text.to_string(),
            title: "Ownership".to_string(),
            url: format!("/library/video-content/{}", id),
            content_type: ContentType::Video,
        }
    }

    #[tokio::test]
    async fn test_memory_vector_index() {
        let index = MemoryVectorIndex::new();
        index
            .upsert(
                &[
                    record("a", "Moves transfer ownership between bindings."),
                    record("b", "Lifetimes describe how long borrows last."),
                ],
                DEFAULT_NAMESPACE,
            )
            .await
            .unwrap();

        let results = index.search("borrows lifetimes", 10, DEFAULT_NAMESPACE).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "/library/video-content/b");
        assert!((results[0].score - 1.0).abs() < f32::EPSILON);

        let results = index.search("astronomy", 10, DEFAULT_NAMESPACE).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let index = MemoryVectorIndex::new();
        let r = record("a", "Text.");
        index.upsert(&[r.clone()], "ns").await.unwrap();
        index.upsert(&[r], "ns").await.unwrap();
        assert_eq!(index.record_count("ns"), 1);
    }

    #[tokio::test]
    async fn test_missing_namespace_then_fallback() {
        let index = MemoryVectorIndex::new();
        index
            .upsert(&[record("a", "Ownership rules for moves.")], "")
            .await
            .unwrap();

        assert!(matches!(
            index.search("ownership", 3, DEFAULT_NAMESPACE).await,
            Err(CuratorError::NamespaceNotFound(_))
        ));

        let results = search_with_fallback(&index, "ownership", 3, DEFAULT_NAMESPACE)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
    }
}
