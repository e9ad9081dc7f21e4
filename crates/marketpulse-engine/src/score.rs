//! Per-partition trend scoring.
//!
//! One HSN code's signal set is scored by exactly one worker at a time;
//! parallelism happens across partitions in the pipeline, never inside one.

use chrono::{DateTime, Duration, Utc};

use crate::rules::{self, RuleWindow};
use crate::types::{RuleId, Signal, TrendCandidate};
use crate::EngineConfig;

/// Outcome of scoring one partition.
#[derive(Debug, Default)]
pub struct PartitionScore {
    pub candidates: Vec<TrendCandidate>,
    /// Rules dropped for this code/window due to [`crate::RuleError`].
    pub rule_errors: usize,
}

/// Day-granular scoring window bounds for a pass at `now`: the window ends
/// at the next midnight and reaches back `lookback_days`. Day granularity
/// keeps window bounds — and therefore alert ids — stable across repeated
/// passes on the same day.
#[must_use]
pub fn window_bounds(now: DateTime<Utc>, lookback_days: u32) -> (DateTime<Utc>, DateTime<Utc>) {
    let end = now
        .date_naive()
        .succ_opt()
        .unwrap_or(now.date_naive())
        .and_hms_opt(0, 0, 0)
        .map_or(now, |dt| dt.and_utc());
    let start = end - Duration::days(i64::from(lookback_days));
    (start, end)
}

/// Score all rules for one HSN code over the lookback window ending at
/// `now`. `signals` is the full retained partition, timestamp ascending;
/// signals before the window feed the threshold rule's trailing baseline.
///
/// Rules are evaluated independently: every hit becomes a candidate, and a
/// failing rule is logged and dropped without disturbing the others.
#[must_use]
pub fn score_partition(
    hsn_code: &str,
    signals: &[Signal],
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> PartitionScore {
    let (window_start, window_end) = window_bounds(now, config.lookback_days);

    let split = signals.partition_point(|s| s.timestamp < window_start);
    let (before, in_window) = signals.split_at(split);

    // Trailing baseline: the last `baseline_len` DEMAND signals before the
    // window.
    let demand_before: Vec<Signal> = before
        .iter()
        .filter(|s| s.kind == crate::types::SignalKind::Demand)
        .cloned()
        .collect();
    let baseline_from = demand_before.len().saturating_sub(config.baseline_len);
    let baseline = &demand_before[baseline_from..];

    let window = RuleWindow {
        hsn_code,
        window_start,
        window_end,
        signals: in_window,
        baseline,
    };

    let mut score = PartitionScore::default();
    for rule in RuleId::all() {
        match rules::evaluate(rule, &window, config) {
            Ok(Some(hit)) => {
                if hit.rationale.is_empty() {
                    // Contract violation: a hit must explain itself.
                    debug_assert!(false, "rule {rule} produced an empty rationale");
                    tracing::error!(code = hsn_code, rule = %rule, "dropping hit with empty rationale");
                    continue;
                }
                score.candidates.push(TrendCandidate {
                    hsn_code: hsn_code.to_string(),
                    rule_id: rule,
                    window_start,
                    window_end,
                    direction: hit.direction,
                    confidence: hit.confidence,
                    rationale: hit.rationale,
                    supporting_signal_ids: hit.supporting_signal_ids,
                });
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(code = hsn_code, rule = %rule, error = %e, "rule evaluation failed; dropping its contribution");
                score.rule_errors += 1;
            }
        }
    }
    score
}
