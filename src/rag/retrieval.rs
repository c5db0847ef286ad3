//! Ordered retrieval strategies.
//!
//! The hosted index is tried first. When it fails, lower-priority
//! strategies (local embeddings, then term matching over the library) get
//! a turn. An empty result is an answer, not a failure, and stops the chain.

use crate::content::ContentStore;
use crate::embedding::{Embedder, EmbeddingRepository};
use crate::error::{CuratorError, Result};
use crate::lexical;
use crate::vector_index::{search_with_fallback, SearchResult, VectorIndex};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Result of one strategy.
#[derive(Debug)]
pub enum StrategyOutcome {
    /// Ranked results, best first.
    Found(Vec<SearchResult>),
    /// The strategy worked but nothing matched.
    Empty,
    /// The strategy could not run.
    Failed(CuratorError),
}

impl From<Result<Vec<SearchResult>>> for StrategyOutcome {
    fn from(result: Result<Vec<SearchResult>>) -> Self {
        match result {
            Ok(results) if results.is_empty() => StrategyOutcome::Empty,
            Ok(results) => StrategyOutcome::Found(results),
            Err(e) => StrategyOutcome::Failed(e),
        }
    }
}

/// One way of finding passages for a query.
#[async_trait]
pub trait RetrievalStrategy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    async fn retrieve(&self, query: &str, top_k: usize, namespace: &str) -> StrategyOutcome;
}

/// Hosted vector index search with namespace fallback and a per-call timeout.
pub struct VectorIndexSearch {
    index: Arc<dyn VectorIndex>,
    timeout: Duration,
}

impl VectorIndexSearch {
    pub fn new(index: Arc<dyn VectorIndex>, timeout: Duration) -> Self {
        Self { index, timeout }
    }
}

#[async_trait]
impl RetrievalStrategy for VectorIndexSearch {
    fn name(&self) -> &str {
        "vector-index"
    }

    async fn retrieve(&self, query: &str, top_k: usize, namespace: &str) -> StrategyOutcome {
        let search = search_with_fallback(self.index.as_ref(), query, top_k, namespace);
        match tokio::time::timeout(self.timeout, search).await {
            Ok(result) => result.into(),
            Err(_) => StrategyOutcome::Failed(CuratorError::Timeout {
                operation: "vector search".to_string(),
                seconds: self.timeout.as_secs(),
            }),
        }
    }
}

/// Query embedding against a local embedding repository.
pub struct EmbeddingSearch {
    embedder: Arc<dyn Embedder>,
    repository: Arc<dyn EmbeddingRepository>,
}

impl EmbeddingSearch {
    pub fn new(embedder: Arc<dyn Embedder>, repository: Arc<dyn EmbeddingRepository>) -> Self {
        Self { embedder, repository }
    }

    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        if self.repository.len().await? == 0 {
            return Err(CuratorError::Search("embedding repository is empty".to_string()));
        }
        let vector = self.embedder.embed(query).await?;
        self.repository.query(&vector, top_k).await
    }
}

#[async_trait]
impl RetrievalStrategy for EmbeddingSearch {
    fn name(&self) -> &str {
        "embedding"
    }

    async fn retrieve(&self, query: &str, top_k: usize, _namespace: &str) -> StrategyOutcome {
        self.search(query, top_k).await.into()
    }
}

/// Term matching over the local content library.
///
/// Results carry no passage text; backfill supplies it.
pub struct LocalContentSearch {
    store: Arc<dyn ContentStore>,
}

impl LocalContentSearch {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RetrievalStrategy for LocalContentSearch {
    fn name(&self) -> &str {
        "local-content"
    }

    async fn retrieve(&self, query: &str, top_k: usize, _namespace: &str) -> StrategyOutcome {
        let items = self.store.items();
        if items.is_empty() {
            return StrategyOutcome::Failed(CuratorError::Content(
                "local content library is empty".to_string(),
            ));
        }

        let mut results: Vec<SearchResult> = items
            .iter()
            .filter_map(|item| {
                let haystack = format!(
                    "{} {} {} {}",
                    item.name(),
                    item.description(),
                    item.categories().join(" "),
                    item.long_text()
                );
                let score = lexical::score(query, &haystack);
                (score > 0.0).then(|| SearchResult {
                    title: item.name().to_string(),
                    url: item.library_url(),
                    content_type: item.content_type(),
                    score,
                    text: None,
                })
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k);
        Ok(results).into()
    }
}

/// Runs strategies in priority order.
pub struct Retriever {
    strategies: Vec<Box<dyn RetrievalStrategy>>,
}

impl Retriever {
    pub fn new(strategies: Vec<Box<dyn RetrievalStrategy>>) -> Self {
        Self { strategies }
    }

    /// Names of the configured strategies, in order.
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Retrieve passages, falling through strategies that fail.
    ///
    /// When every strategy fails, the first strategy's error is returned.
    #[instrument(skip(self))]
    pub async fn retrieve(&self, query: &str, top_k: usize, namespace: &str) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CuratorError::InvalidInput("query must not be empty".to_string()));
        }
        if top_k == 0 {
            return Err(CuratorError::InvalidInput("top_k must be at least 1".to_string()));
        }

        let mut primary_error = None;

        for strategy in &self.strategies {
            match strategy.retrieve(query, top_k, namespace).await {
                StrategyOutcome::Found(results) => {
                    debug!("{} found {} results", strategy.name(), results.len());
                    return Ok(results);
                }
                StrategyOutcome::Empty => {
                    info!("{} found nothing relevant", strategy.name());
                    return Ok(Vec::new());
                }
                StrategyOutcome::Failed(e) => {
                    warn!("{} failed: {}", strategy.name(), e);
                    if primary_error.is_none() {
                        primary_error = Some(e);
                    }
                }
            }
        }

        Err(primary_error
            .unwrap_or_else(|| CuratorError::Search("no retrieval strategy configured".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentItem, ContentLibrary, ContentType, VideoContent};
    use crate::embedding::{EmbeddingRecord, MemoryEmbeddingRepository};
    use crate::vector_index::{MemoryVectorIndex, PassageRecord, DEFAULT_NAMESPACE};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Strategy that returns a canned outcome and counts calls.
    struct Canned {
        name: &'static str,
        outcome: fn() -> StrategyOutcome,
        calls: Arc<AtomicUsize>,
    }

    impl Canned {
        fn boxed(name: &'static str, outcome: fn() -> StrategyOutcome) -> (Box<dyn RetrievalStrategy>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Box::new(Self {
                    name,
                    outcome,
                    calls: calls.clone(),
                }),
                calls,
            )
        }
    }

    #[async_trait]
    impl RetrievalStrategy for Canned {
        fn name(&self) -> &str {
            self.name
        }

        async fn retrieve(&self, _query: &str, _top_k: usize, _namespace: &str) -> StrategyOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }
    }

    fn found() -> StrategyOutcome {
        StrategyOutcome::Found(vec![SearchResult {
            title: "Fallback".to_string(),
            url: "/library/blog-content/fallback".to_string(),
            content_type: ContentType::Blog,
            score: 0.4,
            text: Some("text".to_string()),
        }])
    }

    fn auth_failure() -> StrategyOutcome {
        StrategyOutcome::Failed(CuratorError::Auth("bad key".to_string()))
    }

    fn search_failure() -> StrategyOutcome {
        StrategyOutcome::Failed(CuratorError::Search("down".to_string()))
    }

    #[tokio::test]
    async fn test_falls_through_failures() {
        let (primary, primary_calls) = Canned::boxed("primary", auth_failure);
        let (secondary, secondary_calls) = Canned::boxed("secondary", found);
        let retriever = Retriever::new(vec![primary, secondary]);

        let results = retriever.retrieve("query", 3, DEFAULT_NAMESPACE).await.unwrap();
        assert_eq!(results[0].title, "Fallback");
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_stops_the_chain() {
        let (primary, _) = Canned::boxed("primary", || StrategyOutcome::Empty);
        let (secondary, secondary_calls) = Canned::boxed("secondary", found);
        let retriever = Retriever::new(vec![primary, secondary]);

        let results = retriever.retrieve("query", 3, DEFAULT_NAMESPACE).await.unwrap();
        assert!(results.is_empty());
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_failed_surfaces_primary_error() {
        let (primary, _) = Canned::boxed("primary", auth_failure);
        let (secondary, _) = Canned::boxed("secondary", search_failure);
        let retriever = Retriever::new(vec![primary, secondary]);

        let err = retriever.retrieve("query", 3, DEFAULT_NAMESPACE).await.unwrap_err();
        assert!(matches!(err, CuratorError::Auth(_)));
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected_before_strategies() {
        let (primary, calls) = Canned::boxed("primary", found);
        let retriever = Retriever::new(vec![primary]);

        assert!(matches!(
            retriever.retrieve("  ", 3, DEFAULT_NAMESPACE).await,
            Err(CuratorError::InvalidInput(_))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_vector_index_strategy_uses_namespace_fallback() {
        let index = Arc::new(MemoryVectorIndex::new());
        index
            .upsert(
                &[PassageRecord {
                    id: "closures-0".to_string(),
                    text: "Closures capture their environment.".to_string(),
                    title: "Closures".to_string(),
                    url: "/library/video-content/closures".to_string(),
                    content_type: ContentType::Video,
                }],
                "",
            )
            .await
            .unwrap();

        let strategy = VectorIndexSearch::new(index, Duration::from_secs(5));
        match strategy.retrieve("closures environment", 3, DEFAULT_NAMESPACE).await {
            StrategyOutcome::Found(results) => assert_eq!(results[0].title, "Closures"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    struct AxisEmbedder;

    #[async_trait]
    impl Embedder for AxisEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(if text.contains("first") { vec![1.0, 0.0] } else { vec![0.0, 1.0] })
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out = Vec::new();
            for t in texts {
                out.push(self.embed(t).await?);
            }
            Ok(out)
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    #[tokio::test]
    async fn test_embedding_strategy() {
        let repository = Arc::new(MemoryEmbeddingRepository::new());
        let strategy = EmbeddingSearch::new(Arc::new(AxisEmbedder), repository.clone());

        // Empty repository is a failure so the chain moves on.
        assert!(matches!(
            strategy.retrieve("first", 1, DEFAULT_NAMESPACE).await,
            StrategyOutcome::Failed(_)
        ));

        for (id, embedding) in [("first", vec![1.0, 0.0]), ("second", vec![0.0, 1.0])] {
            repository
                .add(EmbeddingRecord {
                    record: PassageRecord {
                        id: id.to_string(),
                        text: id.to_string(),
                        title: id.to_string(),
                        url: format!("/library/blog-content/{}", id),
                        content_type: ContentType::Blog,
                    },
                    embedding,
                })
                .await
                .unwrap();
        }

        match strategy.retrieve("the first one", 1, DEFAULT_NAMESPACE).await {
            StrategyOutcome::Found(results) => assert_eq!(results[0].title, "first"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_local_content_strategy() {
        let library = ContentLibrary::from_items(vec![ContentItem::Video(VideoContent {
            name: "Pattern Matching".to_string(),
            description: "Match arms and guards.".to_string(),
            categories: vec!["rust".to_string()],
            transcript: "Exhaustive matching prevents bugs.".to_string(),
            url: String::new(),
        })]);
        let strategy = LocalContentSearch::new(Arc::new(library));

        match strategy.retrieve("exhaustive matching", 5, DEFAULT_NAMESPACE).await {
            StrategyOutcome::Found(results) => {
                assert_eq!(results[0].url, "/library/video-content/pattern-matching");
                assert!(results[0].text.is_none());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(matches!(
            strategy.retrieve("astronomy", 5, DEFAULT_NAMESPACE).await,
            StrategyOutcome::Empty
        ));
    }
}
