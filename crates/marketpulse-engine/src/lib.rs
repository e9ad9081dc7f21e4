//! The MarketPulse trend detection and alerting engine.
//!
//! Consumes normalized-ready raw record batches across the ingestion
//! boundary, converts them into HSN-code-scoped signals, scores each code's
//! window with a closed set of explainable rules, deduplicates and ranks
//! the findings, composes actionable alerts, and routes them to matching
//! MSME profiles. The engine is deterministic end to end: identical inputs
//! reproduce identical confidences and alert identities.

pub mod classify;
pub mod compose;
mod error;
pub mod ingest;
pub mod normalize;
pub mod pipeline;
pub mod rank;
pub mod route;
pub mod rules;
pub mod score;
pub mod store;
pub mod types;

pub use error::{EngineError, RuleError};
pub use pipeline::{Engine, IngestSummary, PassReport};

use marketpulse_core::AppConfig;

/// Scoring and classification thresholds, snapshotted from [`AppConfig`]
/// at startup. Validated by the config loader; the engine trusts the
/// values it receives.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub lookback_days: u32,
    pub baseline_len: usize,
    pub demand_multiple: f64,
    pub min_run: usize,
    pub max_reversals: usize,
    pub similarity_threshold: f64,
    pub max_concurrent_partitions: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lookback_days: 30,
            baseline_len: 10,
            demand_multiple: 1.5,
            min_run: 3,
            max_reversals: 1,
            similarity_threshold: 0.5,
            max_concurrent_partitions: 4,
        }
    }
}

impl From<&AppConfig> for EngineConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            lookback_days: config.lookback_days,
            baseline_len: config.baseline_len,
            demand_multiple: config.demand_multiple,
            min_run: config.min_run,
            max_reversals: config.max_reversals,
            similarity_threshold: config.similarity_threshold,
            max_concurrent_partitions: config.max_concurrent_partitions,
        }
    }
}
