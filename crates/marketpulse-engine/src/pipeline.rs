//! Pass orchestration: Normalize → Score → Rank → Compose → Route.
//!
//! The engine is batch/pass-oriented. Each pass scores the current signal
//! window partitioned by HSN code; partitions run concurrently up to a
//! configured bound, but one code is always scored by exactly one worker.
//! Passes are idempotent — alert identity is content-derived — so a failed
//! pass is simply retried wholesale on the next schedule tick.

use chrono::{DateTime, Duration, Utc};
use futures::stream::{self, StreamExt};
use marketpulse_core::{MsmeProfile, Taxonomy};
use uuid::Uuid;

use crate::classify::Classifier;
use crate::compose::compose;
use crate::error::EngineError;
use crate::ingest::SourceBatch;
use crate::normalize::normalize;
use crate::rank::rank;
use crate::route::route_all;
use crate::score::{score_partition, window_bounds, PartitionScore};
use crate::store::SignalStore;
use crate::types::{Alert, Delivery, Signal};
use crate::EngineConfig;

/// Outcome counters for one ingested batch. Rejections are counted, never
/// fatal: a partially degraded batch still contributes its good records.
#[derive(Debug, Default, Clone, Copy)]
pub struct IngestSummary {
    pub accepted: usize,
    pub rejected: usize,
    /// Accepted signals that ended up without an HSN code.
    pub unclassified: usize,
}

/// Everything one pipeline pass produced, plus transparency counters.
#[derive(Debug)]
pub struct PassReport {
    /// Diagnostic identifier for this pass (not part of alert identity).
    pub pass_id: Uuid,
    /// Winning alerts, ranker-ordered (confidence desc, code asc).
    pub alerts: Vec<Alert>,
    /// Routed delivery tasks, alert order preserved.
    pub deliveries: Vec<Delivery>,
    /// Candidates produced before deduplication.
    pub candidates_total: usize,
    /// Rule evaluations dropped due to errors.
    pub rule_errors: usize,
    /// Signals evicted as older than the retention horizon.
    pub evicted: usize,
    /// Retained signals without an HSN code, surfaced separately.
    pub unclassified: usize,
    /// HSN-code partitions scored.
    pub partitions: usize,
}

/// The trend detection engine: owns the taxonomy-backed classifier and the
/// scoring configuration. Construct once at startup from validated config;
/// taxonomy reload is an explicit [`Engine::reload_taxonomy`] call.
pub struct Engine {
    config: EngineConfig,
    taxonomy: Taxonomy,
    classifier: Classifier,
}

impl Engine {
    #[must_use]
    pub fn new(taxonomy: Taxonomy, config: EngineConfig) -> Self {
        let classifier = Classifier::new(&taxonomy, config.similarity_threshold);
        Self {
            config,
            taxonomy,
            classifier,
        }
    }

    #[must_use]
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    #[must_use]
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Swap in a freshly loaded taxonomy and rebuild the classifier index.
    pub fn reload_taxonomy(&mut self, taxonomy: Taxonomy) {
        self.classifier = Classifier::new(&taxonomy, self.config.similarity_threshold);
        self.taxonomy = taxonomy;
    }

    /// Normalize a source batch into the window store.
    ///
    /// Malformed records are logged and counted, never fatal to the batch.
    pub fn ingest(
        &self,
        store: &mut dyn SignalStore,
        batch: &SourceBatch,
        now: DateTime<Utc>,
    ) -> IngestSummary {
        let mut summary = IngestSummary::default();
        for record in &batch.records {
            match normalize(record, &batch.schema, &self.classifier, now) {
                Ok(signal) => {
                    summary.accepted += 1;
                    if signal.hsn_code.is_none() {
                        summary.unclassified += 1;
                    }
                    store.insert(signal);
                }
                Err(rejected) => {
                    summary.rejected += 1;
                    tracing::warn!(
                        source = %batch.schema.source_id,
                        reason = %rejected,
                        "skipping malformed record"
                    );
                }
            }
        }
        tracing::debug!(
            source = %batch.schema.source_id,
            accepted = summary.accepted,
            rejected = summary.rejected,
            unclassified = summary.unclassified,
            "ingested batch"
        );
        summary
    }

    /// Run one full scoring pass over the current window.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] only when the runtime fails to execute a
    /// partition task; per-rule and per-record problems are absorbed into
    /// the report's counters.
    pub async fn run_pass(
        &self,
        store: &mut dyn SignalStore,
        profiles: &[MsmeProfile],
        now: DateTime<Utc>,
    ) -> Result<PassReport, EngineError> {
        let pass_id = Uuid::new_v4();
        let (window_start, _) = window_bounds(now, self.config.lookback_days);

        // Retention reaches one extra lookback span behind the scoring
        // window so the threshold rule's trailing baseline stays available.
        let horizon = window_start - Duration::days(i64::from(self.config.lookback_days));
        let evicted = store.evict_older_than(horizon);
        let unclassified = store.unclassified_len();

        let partitions: Vec<(String, Vec<Signal>)> = store
            .partitions()
            .into_iter()
            .flatten()
            .map(|code| {
                let signals = store.signals_for(Some(&code));
                (code, signals)
            })
            .collect();
        let partition_count = partitions.len();

        let concurrency = self.config.max_concurrent_partitions.max(1);
        let config = self.config.clone();
        let scored: Vec<Result<PartitionScore, tokio::task::JoinError>> =
            stream::iter(partitions)
                .map(|(code, signals)| {
                    let config = config.clone();
                    tokio::task::spawn_blocking(move || {
                        score_partition(&code, &signals, &config, now)
                    })
                })
                .buffer_unordered(concurrency)
                .collect()
                .await;

        let mut candidates = Vec::new();
        let mut rule_errors = 0;
        for result in scored {
            let partition = result.map_err(|e| EngineError::PartitionJoin(e.to_string()))?;
            rule_errors += partition.rule_errors;
            candidates.extend(partition.candidates);
        }
        let candidates_total = candidates.len();

        let winners = rank(candidates);
        let alerts: Vec<Alert> = winners.iter().map(|c| compose(c, now)).collect();
        let deliveries = route_all(&alerts, profiles, &self.taxonomy);

        tracing::info!(
            pass = %pass_id,
            partitions = partition_count,
            candidates = candidates_total,
            alerts = alerts.len(),
            deliveries = deliveries.len(),
            rule_errors,
            evicted,
            unclassified,
            "pipeline pass complete"
        );

        Ok(PassReport {
            pass_id,
            alerts,
            deliveries,
            candidates_total,
            rule_errors,
            evicted,
            unclassified,
            partitions: partition_count,
        })
    }
}
