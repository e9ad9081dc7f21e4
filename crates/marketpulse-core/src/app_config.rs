use std::path::PathBuf;

/// Application configuration, read from environment variables once at
/// startup. Engine thresholds live here so operators can tune them without
/// rebuilding; the engine itself receives a snapshot and never re-reads the
/// environment mid-pass.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// Path to the HSN taxonomy YAML file.
    pub taxonomy_path: PathBuf,
    /// Path to the MSME profiles YAML file.
    pub profiles_path: PathBuf,
    /// Where routed deliveries are written as JSON lines.
    pub out_path: PathBuf,
    /// Scoring lookback horizon in days.
    pub lookback_days: u32,
    /// Number of trailing DEMAND signals forming the threshold-rule baseline.
    pub baseline_len: usize,
    /// Demand-threshold multiple; the rule fires strictly above this ratio.
    pub demand_multiple: f64,
    /// Minimum consecutive same-direction moves for the sustained rule.
    pub min_run: usize,
    /// Bounded counter-moves tolerated inside a sustained run.
    pub max_reversals: usize,
    /// Classifier token-overlap similarity threshold in (0, 1].
    pub similarity_threshold: f64,
    /// Upper bound on concurrently scored HSN-code partitions.
    pub max_concurrent_partitions: usize,
    /// Cron expression for the `watch` subcommand.
    pub watch_schedule: String,
}
