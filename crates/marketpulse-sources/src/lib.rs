//! Signal source collaborators for the MarketPulse engine.
//!
//! Sources live outside the engine: each one implements [`Feed`] and hands
//! back a [`SourceBatch`] of loosely structured records plus the schema the
//! normalizer needs to interpret them. This crate ships deterministic mock
//! feeds (search interest, news headlines, regulatory bulletins) for demos
//! and tests; production adapters plug in behind the same trait.

pub mod mock;
pub mod scorer;

use marketpulse_engine::ingest::SourceBatch;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("source {source_id} unavailable: {reason}")]
    Unavailable { source_id: String, reason: String },
}

/// A signal source. One `fetch` returns everything the source currently has
/// for the engine's window; incremental cursors are the source's own
/// concern.
pub trait Feed {
    /// Stable provenance identifier, also stamped into the batch schema.
    fn source_id(&self) -> &str;

    /// Produce the current batch.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] when the source cannot be read at all. Partial
    /// data is not an error; sources return what they have.
    fn fetch(&self) -> Result<SourceBatch, FeedError>;
}

/// Collect batches from all feeds.
///
/// Continues past individual feed failures, logging warnings. Returns an
/// empty `Vec` if every feed fails.
#[must_use]
pub fn collect_batches(feeds: &[Box<dyn Feed>]) -> Vec<SourceBatch> {
    let mut batches = Vec::new();
    for feed in feeds {
        match feed.fetch() {
            Ok(batch) => {
                tracing::debug!(
                    source = feed.source_id(),
                    records = batch.records.len(),
                    "collected source batch"
                );
                batches.push(batch);
            }
            Err(e) => {
                tracing::warn!(
                    source = feed.source_id(),
                    error = %e,
                    "feed fetch failed"
                );
            }
        }
    }
    batches
}
