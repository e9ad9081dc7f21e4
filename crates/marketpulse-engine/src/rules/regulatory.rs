//! Regulatory-risk rule: any REGULATORY signal in the window raises a
//! NEW_RISK finding regardless of magnitude. Regulatory feeds are treated
//! as low-noise, so confidence is a fixed high constant.

use crate::rules::{RuleHit, RuleWindow};
use crate::types::{Direction, SignalKind};

/// Confidence assigned to every regulatory-risk hit.
pub const REGULATORY_CONFIDENCE: f64 = 0.9;

pub(super) fn evaluate(window: &RuleWindow<'_>) -> Option<RuleHit> {
    let regulatory: Vec<_> = window
        .signals
        .iter()
        .filter(|s| s.kind == SignalKind::Regulatory)
        .collect();
    if regulatory.is_empty() {
        return None;
    }

    let supporting: Vec<String> = regulatory.iter().map(|s| s.signal_id()).collect();
    let mut rationale = vec![format!(
        "{} regulatory bulletin(s) affecting HSN {} in the window",
        regulatory.len(),
        window.hsn_code
    )];
    rationale.extend(supporting.iter().map(|id| format!("signal {id}")));

    Some(RuleHit {
        direction: Direction::NewRisk,
        confidence: REGULATORY_CONFIDENCE,
        rationale,
        supporting_signal_ids: supporting,
    })
}

#[cfg(test)]
mod tests {
    use crate::rules::testutil::{day, signal};
    use crate::rules::{evaluate, RuleWindow};
    use crate::types::{Direction, RuleId, Signal, SignalKind};
    use crate::EngineConfig;

    use super::REGULATORY_CONFIDENCE;

    fn window(signals: &[Signal]) -> RuleWindow<'_> {
        RuleWindow {
            hsn_code: "3004",
            window_start: day(1),
            window_end: day(28),
            signals,
            baseline: &[],
        }
    }

    #[test]
    fn lone_regulatory_signal_fires_new_risk() {
        let signals = vec![signal("3004", 12, 1.0, SignalKind::Regulatory)];
        let hit = evaluate(
            RuleId::RegulatoryRisk,
            &window(&signals),
            &EngineConfig::default(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(hit.direction, Direction::NewRisk);
        assert!((hit.confidence - REGULATORY_CONFIDENCE).abs() < f64::EPSILON);
        // Rationale references exactly the one contributing signal.
        assert_eq!(hit.supporting_signal_ids.len(), 1);
        assert_eq!(hit.supporting_signal_ids[0], signals[0].signal_id());
    }

    #[test]
    fn magnitude_is_irrelevant() {
        let signals = vec![signal("3004", 12, 0.0, SignalKind::Regulatory)];
        let hit = evaluate(
            RuleId::RegulatoryRisk,
            &window(&signals),
            &EngineConfig::default(),
        )
        .unwrap();
        assert!(hit.is_some());
    }

    #[test]
    fn no_regulatory_signals_stays_silent() {
        let signals = vec![signal("3004", 12, 50.0, SignalKind::Demand)];
        let result = evaluate(
            RuleId::RegulatoryRisk,
            &window(&signals),
            &EngineConfig::default(),
        )
        .unwrap();
        assert!(result.is_none());
    }
}
