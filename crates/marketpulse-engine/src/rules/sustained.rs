//! Sustained-direction rule: fires UP or DOWN when daily mean values move
//! in one direction across enough consecutive sub-windows, tolerating a
//! bounded number of counter-moves.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::RuleError;
use crate::rules::{RuleHit, RuleWindow};
use crate::types::{Direction, SignalKind};
use crate::EngineConfig;

/// Daily mean with the signal references that produced it.
struct Bucket {
    date: NaiveDate,
    mean: f64,
    signal_ids: Vec<String>,
}

pub(super) fn evaluate(
    window: &RuleWindow<'_>,
    config: &EngineConfig,
) -> Result<Option<RuleHit>, RuleError> {
    let buckets = daily_buckets(window);
    if buckets.len() < config.min_run + 1 {
        return Ok(None);
    }

    let up = best_run(&buckets, 1.0, config.max_reversals);
    let down = best_run(&buckets, -1.0, config.max_reversals);

    // Longer run wins; on equal length prefer the upward reading.
    let (run, direction) = if down.moves > up.moves {
        (down, Direction::Down)
    } else {
        (up, Direction::Up)
    };

    if run.moves < config.min_run {
        return Ok(None);
    }

    #[allow(clippy::cast_precision_loss)]
    let confidence = (run.moves as f64 / (2.0 * config.min_run as f64)).min(1.0);

    let covered = &buckets[run.start..=run.end];
    let supporting: Vec<String> = covered
        .iter()
        .flat_map(|b| b.signal_ids.iter().cloned())
        .collect();
    let word = match direction {
        Direction::Down => "downward",
        _ => "upward",
    };
    let mut rationale = vec![format!(
        "{word} trend over {} consecutive daily sub-windows ({} to {}) for HSN {}",
        run.moves,
        covered[0].date,
        covered[covered.len() - 1].date,
        window.hsn_code
    )];
    rationale.extend(supporting.iter().map(|id| format!("signal {id}")));

    Ok(Some(RuleHit {
        direction,
        confidence,
        rationale,
        supporting_signal_ids: supporting,
    }))
}

/// Group non-regulatory window signals into day buckets of mean value,
/// ordered by date.
fn daily_buckets(window: &RuleWindow<'_>) -> Vec<Bucket> {
    let mut by_day: BTreeMap<NaiveDate, (f64, u32, Vec<String>)> = BTreeMap::new();
    for signal in window
        .signals
        .iter()
        .filter(|s| s.kind != SignalKind::Regulatory)
    {
        let entry = by_day.entry(signal.timestamp.date_naive()).or_default();
        entry.0 += signal.value;
        entry.1 += 1;
        entry.2.push(signal.signal_id());
    }
    by_day
        .into_iter()
        .map(|(date, (sum, count, signal_ids))| Bucket {
            date,
            mean: sum / f64::from(count),
            signal_ids,
        })
        .collect()
}

struct Run {
    /// Count of moves in the run's direction.
    moves: usize,
    /// Inclusive bucket indices covered by the run.
    start: usize,
    end: usize,
}

/// Greedy scan for the longest run of moves whose sign matches `sign`,
/// spending at most `max_reversals` counter-moves; flat moves neither count
/// nor break. Deterministic: earlier runs win ties.
fn best_run(buckets: &[Bucket], sign: f64, max_reversals: usize) -> Run {
    let mut best = Run {
        moves: 0,
        start: 0,
        end: 0,
    };
    let mut moves = 0usize;
    let mut reversals = 0usize;
    let mut start = 0usize;

    for i in 1..buckets.len() {
        let delta = buckets[i].mean - buckets[i - 1].mean;
        if delta * sign > 0.0 {
            moves += 1;
        } else if delta * sign < 0.0 {
            reversals += 1;
            if reversals > max_reversals {
                moves = 0;
                reversals = 0;
                start = i;
                continue;
            }
        }
        if moves > best.moves {
            best = Run {
                moves,
                start,
                end: i,
            };
        }
    }
    best
}
