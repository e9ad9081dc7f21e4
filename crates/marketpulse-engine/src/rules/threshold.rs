//! Demand-threshold rule: fires UP when the windowed average of DEMAND
//! signals exceeds a configured multiple of the trailing baseline average.

use crate::error::RuleError;
use crate::rules::{RuleHit, RuleWindow};
use crate::types::{Direction, SignalKind};
use crate::EngineConfig;

pub(super) fn evaluate(
    window: &RuleWindow<'_>,
    config: &EngineConfig,
) -> Result<Option<RuleHit>, RuleError> {
    let demand: Vec<_> = window
        .signals
        .iter()
        .filter(|s| s.kind == SignalKind::Demand)
        .collect();
    let baseline: Vec<_> = window
        .baseline
        .iter()
        .filter(|s| s.kind == SignalKind::Demand)
        .collect();

    if demand.is_empty() || baseline.is_empty() {
        return Ok(None);
    }

    let window_avg = mean(demand.iter().map(|s| s.value));
    let baseline_avg = mean(baseline.iter().map(|s| s.value));

    // A non-positive baseline has no meaningful "multiple of"; stay silent
    // rather than divide into nonsense.
    if baseline_avg <= 0.0 {
        return Ok(None);
    }

    let ratio = window_avg / baseline_avg;
    let multiple = config.demand_multiple;
    if ratio <= multiple {
        return Ok(None);
    }

    // Linear in how far the ratio sits above the multiple; a ratio of
    // 2x the multiple caps at exactly 1.0.
    let confidence = ((ratio - multiple) / multiple).clamp(0.0, 1.0);

    let mut rationale = vec![format!(
        "windowed demand average {window_avg:.2} is {ratio:.2}x the trailing baseline \
         {baseline_avg:.2} (threshold {multiple:.2}x) for HSN {}",
        window.hsn_code
    )];
    let supporting: Vec<String> = demand.iter().map(|s| s.signal_id()).collect();
    rationale.extend(supporting.iter().map(|id| format!("signal {id}")));

    Ok(Some(RuleHit {
        direction: Direction::Up,
        confidence,
        rationale,
        supporting_signal_ids: supporting,
    }))
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0u32;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::rules::testutil::{day, signal};
    use crate::rules::{evaluate, RuleWindow};
    use crate::types::{Direction, RuleId, Signal, SignalKind};
    use crate::EngineConfig;

    fn window<'a>(signals: &'a [Signal], baseline: &'a [Signal]) -> RuleWindow<'a> {
        RuleWindow {
            hsn_code: "1006",
            window_start: day(1),
            window_end: day(30),
            signals,
            baseline,
        }
    }

    fn demand_series(value: f64, count: usize) -> Vec<Signal> {
        (0..count)
            .map(|i| {
                #[allow(clippy::cast_possible_truncation)]
                let d = (i % 28) as u32 + 1;
                signal("1006", d, value, SignalKind::Demand)
            })
            .collect()
    }

    #[test]
    fn three_times_baseline_caps_confidence_at_one() {
        let signals = demand_series(90.0, 30);
        let baseline = demand_series(30.0, 10);
        let hit = evaluate(
            RuleId::DemandThreshold,
            &window(&signals, &baseline),
            &EngineConfig::default(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(hit.direction, Direction::Up);
        assert!(
            (hit.confidence - 1.0).abs() < f64::EPSILON,
            "expected capped confidence 1.0, got {}",
            hit.confidence
        );
        assert_eq!(hit.supporting_signal_ids.len(), 30);
        assert!(!hit.rationale.is_empty());
        assert!(hit.rationale[0].contains("3.00x"));
    }

    #[test]
    fn below_multiple_stays_silent() {
        let signals = demand_series(40.0, 10);
        let baseline = demand_series(30.0, 10);
        let result = evaluate(
            RuleId::DemandThreshold,
            &window(&signals, &baseline),
            &EngineConfig::default(),
        )
        .unwrap();
        assert!(result.is_none(), "expected no hit, got: {result:?}");
    }

    #[test]
    fn confidence_scales_linearly_between_multiple_and_cap() {
        // ratio 2.25 with multiple 1.5 -> (2.25 - 1.5) / 1.5 = 0.5
        let signals = demand_series(67.5, 20);
        let baseline = demand_series(30.0, 10);
        let hit = evaluate(
            RuleId::DemandThreshold,
            &window(&signals, &baseline),
            &EngineConfig::default(),
        )
        .unwrap()
        .unwrap();
        assert!(
            (hit.confidence - 0.5).abs() < 1e-12,
            "expected 0.5, got {}",
            hit.confidence
        );
    }

    #[test]
    fn no_baseline_means_no_hit() {
        let signals = demand_series(90.0, 30);
        let result = evaluate(
            RuleId::DemandThreshold,
            &window(&signals, &[]),
            &EngineConfig::default(),
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn non_demand_signals_are_ignored() {
        let mut signals = demand_series(90.0, 5);
        signals.push(signal("1006", 12, 1000.0, SignalKind::Price));
        let baseline = demand_series(30.0, 10);
        let hit = evaluate(
            RuleId::DemandThreshold,
            &window(&signals, &baseline),
            &EngineConfig::default(),
        )
        .unwrap()
        .unwrap();
        // Price outlier must not inflate the demand average.
        assert_eq!(hit.supporting_signal_ids.len(), 5);
        assert!((hit.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn identical_windows_yield_identical_confidence() {
        let signals = demand_series(70.0, 12);
        let baseline = demand_series(30.0, 10);
        let config = EngineConfig::default();
        let a = evaluate(RuleId::DemandThreshold, &window(&signals, &baseline), &config)
            .unwrap()
            .unwrap();
        let b = evaluate(RuleId::DemandThreshold, &window(&signals, &baseline), &config)
            .unwrap()
            .unwrap();
        assert!((a.confidence - b.confidence).abs() < f64::EPSILON);
        assert_eq!(a.confidence.to_bits(), b.confidence.to_bits());
    }

    #[test]
    fn non_positive_baseline_stays_silent() {
        let signals = demand_series(90.0, 10);
        let baseline = demand_series(-5.0, 10);
        let result = evaluate(
            RuleId::DemandThreshold,
            &window(&signals, &baseline),
            &EngineConfig::default(),
        )
        .unwrap();
        assert!(result.is_none());
    }
}
