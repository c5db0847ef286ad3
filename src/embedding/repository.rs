//! Local store of passage embeddings.
//!
//! Backs the embedding-search fallback used when the hosted index is
//! unreachable. Callers inject a repository; nothing here is global.

use crate::error::Result;
use crate::vector_index::{PassageRecord, SearchResult};
use async_trait::async_trait;
use std::sync::RwLock;

/// A passage with its embedding.
#[derive(Debug, Clone)]
pub struct EmbeddingRecord {
    pub record: PassageRecord,
    pub embedding: Vec<f32>,
}

/// Storage for passage embeddings.
#[async_trait]
pub trait EmbeddingRepository: Send + Sync {
    /// Add a record, replacing any record with the same id.
    async fn add(&self, record: EmbeddingRecord) -> Result<()>;

    /// The `k` records most similar to `vector`, best first.
    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<SearchResult>>;

    /// Number of stored records.
    async fn len(&self) -> Result<usize>;
}

/// In-process embedding repository.
#[derive(Default)]
pub struct MemoryEmbeddingRepository {
    records: RwLock<Vec<EmbeddingRecord>>,
}

impl MemoryEmbeddingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmbeddingRepository for MemoryEmbeddingRepository {
    async fn add(&self, record: EmbeddingRecord) -> Result<()> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        match records.iter_mut().find(|r| r.record.id == record.record.id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        Ok(())
    }

    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());

        let mut results: Vec<SearchResult> = records
            .iter()
            .map(|r| SearchResult {
                score: cosine_similarity(vector, &r.embedding),
                ..SearchResult::from(&r.record)
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);
        Ok(results)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.records.read().unwrap_or_else(|e| e.into_inner()).len())
    }
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentType;

    fn embedded(id: &str, embedding: Vec<f32>) -> EmbeddingRecord {
        EmbeddingRecord {
            record: PassageRecord {
                id: id.to_string(),
                text: format!("text of {}", id),
                title: id.to_string(),
                url: format!("/library/blog-content/{}", id),
                content_type: ContentType::Blog,
            },
            embedding,
        }
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);

        assert_eq!(cosine_similarity(&a, &[1.0]), 0.0);
    }

    #[tokio::test]
    async fn test_query_ranks_by_similarity() {
        let repo = MemoryEmbeddingRepository::new();
        repo.add(embedded("x", vec![1.0, 0.0])).await.unwrap();
        repo.add(embedded("y", vec![0.0, 1.0])).await.unwrap();
        repo.add(embedded("xy", vec![1.0, 1.0])).await.unwrap();

        let results = repo.query(&[1.0, 0.1], 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "x");
        assert_eq!(results[1].title, "xy");
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn test_add_replaces_same_id() {
        let repo = MemoryEmbeddingRepository::new();
        repo.add(embedded("x", vec![1.0, 0.0])).await.unwrap();
        repo.add(embedded("x", vec![0.0, 1.0])).await.unwrap();
        assert_eq!(repo.len().await.unwrap(), 1);

        let results = repo.query(&[0.0, 1.0], 1).await.unwrap();
        assert!((results[0].score - 1.0).abs() < 0.001);
    }
}
