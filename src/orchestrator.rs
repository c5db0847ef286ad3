//! Pipeline orchestrator for Curator.
//!
//! Turns settings into concrete components: the content library, the
//! chunker, the vector index and the question-answering engine.

use crate::chunking::{create_chunker, Chunker};
use crate::config::{Prompts, Settings};
use crate::content::{ContentLibrary, ContentStore};
use crate::embedding::{Embedder, EmbeddingRecord, EmbeddingRepository, MemoryEmbeddingRepository, OpenAIEmbedder};
use crate::error::{CuratorError, Result};
use crate::indexing::{prepare_records, BatchIndexer, IndexReport};
use crate::rag::{
    EmbeddingSearch, Generator, LocalContentSearch, OpenAIGenerator, RagEngine, RetrievalStrategy,
    Retriever, VectorIndexSearch,
};
use crate::vector_index::{MemoryVectorIndex, PassageRecord, PineconeIndex, VectorIndex};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Passages embedded per request when warming the embedding fallback.
const EMBED_BATCH: usize = 64;

/// The main orchestrator for the Curator pipeline.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    library: Arc<ContentLibrary>,
    chunker: Box<dyn Chunker>,
    index: Arc<dyn VectorIndex>,
    memory_index: Option<Arc<MemoryVectorIndex>>,
    embedder: Arc<dyn Embedder>,
    embeddings: Arc<MemoryEmbeddingRepository>,
}

impl Orchestrator {
    /// Create an orchestrator from settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let library = ContentLibrary::load_or_empty(&settings.library_path())?;
        info!("Content library has {} items", library.len());

        let (index, memory_index) = build_index(&settings)?;
        Self::with_components(settings, library, index, memory_index)
    }

    /// Create an orchestrator with an explicit library and index.
    pub fn with_components(
        settings: Settings,
        library: ContentLibrary,
        index: Arc<dyn VectorIndex>,
        memory_index: Option<Arc<MemoryVectorIndex>>,
    ) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;
        let chunker = create_chunker(settings.chunking.strategy(), settings.chunking.config());
        let embedder = Arc::new(OpenAIEmbedder::with_config(
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
        )?);

        Ok(Self {
            settings,
            prompts,
            library: Arc::new(library),
            chunker,
            index,
            memory_index,
            embedder,
            embeddings: Arc::new(MemoryEmbeddingRepository::new()),
        })
    }

    /// Replace the embedder used by the embedding fallback.
    pub fn with_embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = embedder;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn library(&self) -> Arc<ContentLibrary> {
        self.library.clone()
    }

    pub fn chunker(&self) -> &dyn Chunker {
        self.chunker.as_ref()
    }

    pub fn index(&self) -> Arc<dyn VectorIndex> {
        self.index.clone()
    }

    /// Namespace from settings.
    pub fn namespace(&self) -> &str {
        &self.settings.vector_index.namespace
    }

    /// Passage records for the whole library.
    pub fn records(&self) -> Vec<PassageRecord> {
        prepare_records(self.library.items(), self.chunker.as_ref())
    }

    /// Chunk the library and upsert it into `namespace` in throttled batches.
    #[instrument(skip(self, on_batch))]
    pub async fn index_library(
        &self,
        namespace: &str,
        on_batch: impl FnMut(usize) + Send,
    ) -> Result<IndexReport> {
        let records = self.records();
        if records.is_empty() {
            return Err(CuratorError::Content(format!(
                "no passages to index from {}",
                self.settings.library_path().display()
            )));
        }

        info!("Indexing {} passages into '{}'", records.len(), namespace);
        BatchIndexer::from_settings(self.index.clone(), &self.settings.indexing)
            .index(&records, namespace, on_batch)
            .await
    }

    /// Load in-process stores that start empty.
    ///
    /// Fills the memory index from the library when that provider is in use,
    /// and embeds every passage when the embedding fallback is enabled.
    pub async fn prepare(&self) -> Result<()> {
        let needs_memory = self.memory_index.is_some();
        let needs_embeddings = self.settings.rag.embedding_fallback;
        if !needs_memory && !needs_embeddings {
            return Ok(());
        }

        let records = self.records();

        if let Some(memory) = &self.memory_index {
            memory.upsert(&records, self.namespace()).await?;
            debug!("Memory index holds {} passages", memory.record_count(self.namespace()));
        }

        if needs_embeddings && self.embeddings.len().await? == 0 {
            info!("Embedding {} passages for the local fallback", records.len());
            for batch in records.chunks(EMBED_BATCH) {
                let texts: Vec<String> = batch.iter().map(|r| r.text.clone()).collect();
                let vectors = self.embedder.embed_batch(&texts).await?;
                for (record, embedding) in batch.iter().zip(vectors) {
                    self.embeddings
                        .add(EmbeddingRecord {
                            record: record.clone(),
                            embedding,
                        })
                        .await?;
                }
            }
        }

        Ok(())
    }

    /// Retrieval strategies in priority order, per settings.
    pub fn retriever(&self) -> Retriever {
        let rag = &self.settings.rag;
        let mut strategies: Vec<Box<dyn RetrievalStrategy>> = vec![Box::new(VectorIndexSearch::new(
            self.index.clone(),
            Duration::from_secs(rag.search_timeout_secs),
        ))];

        if rag.embedding_fallback {
            strategies.push(Box::new(EmbeddingSearch::new(
                self.embedder.clone(),
                self.embeddings.clone(),
            )));
        }
        if rag.local_fallback {
            strategies.push(Box::new(LocalContentSearch::new(self.library.clone())));
        }

        Retriever::new(strategies)
    }

    /// Build a question-answering engine using the OpenAI generator.
    pub fn rag_engine(&self, model: Option<&str>) -> Result<RagEngine> {
        let generator = OpenAIGenerator::new()?.with_temperature(self.settings.rag.temperature);
        Ok(self.rag_engine_with(Arc::new(generator), model))
    }

    /// Build a question-answering engine around `generator`.
    pub fn rag_engine_with(&self, generator: Arc<dyn Generator>, model: Option<&str>) -> RagEngine {
        let rag = &self.settings.rag;
        let retriever = self.retriever();
        debug!("Retrieval strategies: {:?}", retriever.strategy_names());

        RagEngine::new(retriever, self.library.clone(), generator)
            .with_prompts(self.prompts.clone())
            .with_model(model.unwrap_or(rag.model.as_str()))
            .with_top_k(rag.top_k)
            .with_namespace(self.namespace())
            .with_generation_timeout(Duration::from_secs(rag.generation_timeout_secs))
    }
}

/// Build the configured vector index.
///
/// The memory index is also returned separately so it can be filled locally.
pub fn build_index(settings: &Settings) -> Result<(Arc<dyn VectorIndex>, Option<Arc<MemoryVectorIndex>>)> {
    let vi = &settings.vector_index;
    match vi.provider.to_lowercase().as_str() {
        "pinecone" => {
            let host = vi.host.as_deref().filter(|h| !h.trim().is_empty()).ok_or_else(|| {
                CuratorError::Config("vector_index.host must be set for the pinecone provider".to_string())
            })?;
            let api_key = std::env::var(&vi.api_key_env).map_err(|_| {
                CuratorError::MissingCredential(format!("{} is not set", vi.api_key_env))
            })?;
            let index = PineconeIndex::new(host, &api_key, Duration::from_secs(vi.timeout_secs))?;
            Ok((Arc::new(index), None))
        }
        "memory" => {
            let memory = Arc::new(MemoryVectorIndex::new());
            Ok((memory.clone(), Some(memory)))
        }
        other => Err(CuratorError::Config(format!("Unknown vector index provider: {}", other))),
    }
}
