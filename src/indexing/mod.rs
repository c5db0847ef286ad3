//! Batch indexing of library passages into the vector index.
//!
//! Records go out in fixed-size batches with a pause after each one. A batch
//! that hits a rate limit is retried in place with exponential backoff; when
//! retries run out the whole run stops instead of skipping data.

mod retry;

pub use retry::{RetryPolicy, MAX_BACKOFF_RETRIES};

use crate::chunking::Chunker;
use crate::config::IndexingSettings;
use crate::content::ContentItem;
use crate::error::{CuratorError, Result};
use crate::vector_index::{PassageRecord, VectorIndex};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Chunk every item into passage records.
///
/// Items without long-form text are indexed by their description. Record
/// ids are `{type}-{slug}-{ordinal}` so re-indexing overwrites earlier
/// passages while a video and a post sharing a name stay distinct.
pub fn prepare_records(items: &[ContentItem], chunker: &dyn Chunker) -> Vec<PassageRecord> {
    let mut records = Vec::new();

    for item in items {
        let text = if item.long_text().trim().is_empty() {
            item.description()
        } else {
            item.long_text()
        };

        let content_type = item.content_type();
        let slug = item.slug();
        let url = item.library_url();
        let passages = chunker.chunk(text);
        if passages.is_empty() {
            debug!("'{}' has no text to index", item.name());
            continue;
        }

        records.extend(passages.into_iter().enumerate().map(|(ordinal, text)| PassageRecord {
            id: format!("{}-{}-{}", content_type.path_segment(), slug, ordinal),
            text,
            title: item.name().to_string(),
            url: url.clone(),
            content_type,
        }));
    }

    records
}

/// Outcome of an indexing run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexReport {
    /// Batches written.
    pub batches: usize,
    /// Records written.
    pub records: usize,
    /// Upsert calls made, including retries.
    pub attempts: usize,
    /// Every backoff delay waited, in order.
    pub backoff_delays: Vec<Duration>,
}

/// Writes records to a vector index in throttled batches.
pub struct BatchIndexer {
    index: Arc<dyn VectorIndex>,
    batch_size: usize,
    batch_delay: Duration,
    retry: RetryPolicy,
}

impl BatchIndexer {
    /// Create a batch indexer with explicit limits.
    pub fn new(index: Arc<dyn VectorIndex>, batch_size: usize, batch_delay: Duration, retry: RetryPolicy) -> Self {
        Self {
            index,
            batch_size: batch_size.max(1),
            batch_delay,
            retry,
        }
    }

    /// Create a batch indexer from settings.
    pub fn from_settings(index: Arc<dyn VectorIndex>, settings: &IndexingSettings) -> Self {
        Self::new(
            index,
            settings.batch_size,
            settings.batch_delay(),
            RetryPolicy::from(settings),
        )
    }

    /// Upsert `records` into `namespace`.
    ///
    /// `on_batch` is called with the number of records written after each batch.
    #[instrument(skip(self, records, on_batch), fields(count = records.len()))]
    pub async fn index(
        &self,
        records: &[PassageRecord],
        namespace: &str,
        mut on_batch: impl FnMut(usize) + Send,
    ) -> Result<IndexReport> {
        let mut report = IndexReport::default();
        let batch_count = records.len().div_ceil(self.batch_size);

        for (batch_no, batch) in records.chunks(self.batch_size).enumerate() {
            self.upsert_with_backoff(batch, namespace, &mut report).await?;

            report.batches += 1;
            report.records += batch.len();
            on_batch(batch.len());
            debug!("Batch {}/{} written ({} records)", batch_no + 1, batch_count, batch.len());

            if batch_no + 1 < batch_count && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }
        }

        info!(
            "Indexed {} records in {} batches ({} attempts)",
            report.records, report.batches, report.attempts
        );
        Ok(report)
    }

    async fn upsert_with_backoff(
        &self,
        batch: &[PassageRecord],
        namespace: &str,
        report: &mut IndexReport,
    ) -> Result<()> {
        let mut retries = 0;

        loop {
            report.attempts += 1;
            match self.index.upsert(batch, namespace).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_rate_limited() => {
                    if retries >= self.retry.max_retries {
                        return Err(CuratorError::Indexing(format!(
                            "still rate limited after {} retries: {}",
                            retries, e
                        )));
                    }
                    retries += 1;
                    let delay = self.retry.delay_for(retries);
                    warn!("Rate limited, retry {} in {:?}", retries, delay);
                    report.backoff_delays.push(delay);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
