//! Curator - passage indexing and grounded answers for a content library
//!
//! # Overview
//!
//! Curator allows you to:
//! - Split video transcripts and blog posts into paragraph-sized passages
//! - Push passages into a hosted vector index in rate-limit-aware batches
//! - Answer questions using only retrieved passages, with cited sources
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `content` - Content items, slugs and the local library
//! - `chunking` - Sentence segmentation and paragraph packing
//! - `lexical` - Term-overlap scoring for in-process search
//! - `embedding` - Embedding generation and the local embedding repository
//! - `vector_index` - Vector index abstraction (Pinecone, in-memory)
//! - `indexing` - Throttled batch upserts with backoff
//! - `rag` - Retrieval, backfill, prompt assembly and generation
//! - `orchestrator` - Wires settings into components
//!
//! # Example
//!
//! ```rust,no_run
//! use curator::config::Settings;
//! use curator::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!     orchestrator.prepare().await?;
//!
//!     let engine = orchestrator.rag_engine(None)?;
//!     let response = engine.answer("How do I handle errors?").await?;
//!     println!("{}", response.format_for_display());
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod content;
pub mod embedding;
pub mod error;
pub mod indexing;
pub mod lexical;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod vector_index;

pub use error::{CuratorError, Result};
