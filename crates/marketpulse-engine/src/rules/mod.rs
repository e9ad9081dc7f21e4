//! The built-in scoring rules.
//!
//! Rules form a closed enumeration ([`RuleId`]) with one module per rule
//! and a uniform signature: each sees the same [`RuleWindow`] and either
//! produces a [`RuleHit`] or stays silent. Rules are pure — identical
//! windows always yield bit-identical confidence — and evaluated
//! independently; overlapping hits are resolved later by the ranker, never
//! suppressed here.

mod regulatory;
mod sustained;
mod threshold;

use chrono::{DateTime, Utc};

use crate::error::RuleError;
use crate::types::{Direction, RuleId, Signal};
use crate::EngineConfig;

/// The signal window one rule evaluation sees.
#[derive(Debug, Clone, Copy)]
pub struct RuleWindow<'a> {
    pub hsn_code: &'a str,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    /// Signals inside the window, timestamp ascending.
    pub signals: &'a [Signal],
    /// Trailing DEMAND signals immediately preceding the window, timestamp
    /// ascending. Used only by the threshold rule's baseline.
    pub baseline: &'a [Signal],
}

/// A rule's positive finding: direction, deterministic confidence, and the
/// explainability payload. `rationale` must never be empty — a hit without
/// an explanation is a contract violation.
#[derive(Debug, Clone)]
pub struct RuleHit {
    pub direction: Direction,
    pub confidence: f64,
    pub rationale: Vec<String>,
    pub supporting_signal_ids: Vec<String>,
}

/// Evaluate one rule against a window.
///
/// # Errors
///
/// Returns [`RuleError`] on malformed window data (inconsistent bounds,
/// non-finite values). The caller drops this rule's contribution for the
/// code/window and lets the remaining rules run.
pub fn evaluate(
    rule: RuleId,
    window: &RuleWindow<'_>,
    config: &EngineConfig,
) -> Result<Option<RuleHit>, RuleError> {
    if window.window_start > window.window_end {
        return Err(RuleError::InconsistentWindow(format!(
            "window_start {} is after window_end {}",
            window.window_start, window.window_end
        )));
    }
    if let Some(bad) = window
        .signals
        .iter()
        .chain(window.baseline.iter())
        .find(|s| !s.value.is_finite())
    {
        return Err(RuleError::NonFiniteWindowValue(bad.signal_id()));
    }

    match rule {
        RuleId::DemandThreshold => threshold::evaluate(window, config),
        RuleId::SustainedDirection => sustained::evaluate(window, config),
        RuleId::RegulatoryRisk => Ok(regulatory::evaluate(window)),
    }
}
