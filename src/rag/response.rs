//! The question-answering engine.

use super::{assemble_prompt, backfill_all, Generator, Retriever};
use crate::config::Prompts;
use crate::content::ContentStore;
use crate::error::{CuratorError, Result};
use crate::vector_index::{SearchResult, DEFAULT_NAMESPACE};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Answer given when retrieval finds nothing.
const NO_CONTENT_ANSWER: &str =
    "I couldn't find anything in the content library that answers this question.";

/// How a response came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    /// The model answered from retrieved sources.
    Answered,
    /// Retrieval found nothing, so the model was not called.
    NoRelevantContent,
}

/// An answer with the sources it was grounded in.
#[derive(Debug, Clone, Serialize)]
pub struct RagResponse {
    pub answer: String,
    pub sources: Vec<SearchResult>,
    pub outcome: AnswerOutcome,
}

impl RagResponse {
    /// Format the response for display.
    pub fn format_for_display(&self) -> String {
        let mut output = self.answer.clone();

        if !self.sources.is_empty() {
            output.push_str("\n\n--- Sources ---\n");
            for (i, source) in self.sources.iter().enumerate() {
                output.push_str(&format!(
                    "\n[{}] {} ({}, score: {:.2})\n  {}",
                    i + 1,
                    source.title,
                    source.content_type,
                    source.score,
                    source.url
                ));
            }
        }

        output
    }
}

/// Runs retrieval, backfill, prompt assembly and generation for a query.
pub struct RagEngine {
    retriever: Retriever,
    store: Arc<dyn ContentStore>,
    generator: Arc<dyn Generator>,
    prompts: Prompts,
    model: String,
    top_k: usize,
    namespace: String,
    generation_timeout: Duration,
}

impl RagEngine {
    /// Create a new engine with default prompts, model and limits.
    pub fn new(retriever: Retriever, store: Arc<dyn ContentStore>, generator: Arc<dyn Generator>) -> Self {
        Self {
            retriever,
            store,
            generator,
            prompts: Prompts::default(),
            model: "gpt-4o-mini".to_string(),
            top_k: 5,
            namespace: DEFAULT_NAMESPACE.to_string(),
            generation_timeout: Duration::from_secs(60),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Switch the namespace used by later queries.
    pub fn set_namespace(&mut self, namespace: &str) {
        info!("Switching namespace to '{}'", namespace);
        self.namespace = namespace.to_string();
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Retrieve and backfill passages for `query`.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        let mut results = self.retriever.retrieve(query, top_k, &self.namespace).await?;
        backfill_all(&mut results, self.store.as_ref());
        Ok(results)
    }

    /// Answer `query` from the content library.
    #[instrument(skip(self), fields(namespace = %self.namespace))]
    pub async fn answer(&self, query: &str) -> Result<RagResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CuratorError::InvalidInput("question must not be empty".to_string()));
        }

        let sources = self.search(query, self.top_k).await?;
        if sources.is_empty() {
            info!("No relevant content for question");
            return Ok(RagResponse {
                answer: NO_CONTENT_ANSWER.to_string(),
                sources,
                outcome: AnswerOutcome::NoRelevantContent,
            });
        }

        let prompt = assemble_prompt(&self.prompts, query, &sources);
        debug!("Prompt assembled from {} sources ({} chars)", sources.len(), prompt.len());

        let answer = tokio::time::timeout(
            self.generation_timeout,
            self.generator.generate(&prompt, &self.model),
        )
        .await
        .map_err(|_| CuratorError::Timeout {
            operation: "answer generation".to_string(),
            seconds: self.generation_timeout.as_secs(),
        })??;

        Ok(RagResponse {
            answer,
            sources,
            outcome: AnswerOutcome::Answered,
        })
    }
}
