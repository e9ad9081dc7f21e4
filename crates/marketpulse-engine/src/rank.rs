//! Candidate deduplication and ranking.
//!
//! Overlapping candidates for the same HSN code collapse to a single
//! winner, keeping the highest-confidence rationale. The surviving set is
//! globally ordered for consumers.

use std::collections::BTreeMap;

use crate::types::TrendCandidate;

/// Deduplicate and order trend candidates.
///
/// Per HSN code, candidates whose windows intersect form a cluster; each
/// cluster keeps the candidate with the highest confidence, tie-broken by
/// rule priority (regulatory > threshold > sustained — certainty, not
/// importance) and then earliest `window_start`. Output order: confidence
/// descending, `hsn_code` ascending. Idempotent: ranking the winners again
/// returns them unchanged.
#[must_use]
pub fn rank(candidates: Vec<TrendCandidate>) -> Vec<TrendCandidate> {
    let mut by_code: BTreeMap<String, Vec<TrendCandidate>> = BTreeMap::new();
    for candidate in candidates {
        by_code
            .entry(candidate.hsn_code.clone())
            .or_default()
            .push(candidate);
    }

    let mut winners: Vec<TrendCandidate> = Vec::new();
    for (_, mut group) in by_code {
        group.sort_by_key(|c| c.window_start);
        for cluster in clusters(group) {
            if let Some(winner) = pick_winner(cluster) {
                winners.push(winner);
            }
        }
    }

    winners.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.hsn_code.cmp(&b.hsn_code))
    });
    winners
}

/// Split one code's candidates (sorted by `window_start`) into clusters of
/// transitively intersecting windows. Windows touching at a single instant
/// count as overlapping.
fn clusters(group: Vec<TrendCandidate>) -> Vec<Vec<TrendCandidate>> {
    let mut out: Vec<Vec<TrendCandidate>> = Vec::new();
    let mut current: Vec<TrendCandidate> = Vec::new();
    let mut current_end = None;

    for candidate in group {
        let extends = current_end.is_some_and(|end| candidate.window_start <= end);
        if extends {
            current_end = current_end.max(Some(candidate.window_end));
            current.push(candidate);
        } else {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            current_end = Some(candidate.window_end);
            current.push(candidate);
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn pick_winner(cluster: Vec<TrendCandidate>) -> Option<TrendCandidate> {
    cluster.into_iter().reduce(|best, other| {
        let replace = other.confidence > best.confidence
            || (other.confidence == best.confidence
                && (other.rule_id.priority() < best.rule_id.priority()
                    || (other.rule_id.priority() == best.rule_id.priority()
                        && other.window_start < best.window_start)));
        if replace {
            other
        } else {
            best
        }
    })
}
