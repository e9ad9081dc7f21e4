//! Recommendation composition: winning candidates become actionable,
//! language-neutral alert records.
//!
//! Templates are keyed by `(direction, rule_id)`. Composition fails
//! closed: an unmatched pair falls back to a generic template — every
//! scored candidate must surface as an alert, silent loss is a defect.

use chrono::{DateTime, Utc};

use crate::types::{alert_id, Alert, Direction, RuleId, TrendCandidate};

struct Template {
    direction: Direction,
    rule_id: RuleId,
    headline: &'static str,
    action_tip: &'static str,
}

/// Action-tip vocabulary per trend category. `{hsn}` is replaced with the
/// candidate's code.
const TEMPLATES: &[Template] = &[
    Template {
        direction: Direction::Up,
        rule_id: RuleId::DemandThreshold,
        headline: "Strong Demand Increase",
        action_tip: "Consider increasing stock and negotiating supplier rates for HSN {hsn} \
                     ahead of the surge.",
    },
    Template {
        direction: Direction::Up,
        rule_id: RuleId::SustainedDirection,
        headline: "Steady Demand Uptrend",
        action_tip: "Plan inventory and working capital for continued growth in HSN {hsn}.",
    },
    Template {
        direction: Direction::Down,
        rule_id: RuleId::SustainedDirection,
        headline: "Sustained Demand Decline",
        action_tip: "Avoid overstocking HSN {hsn}; consider promotions or diversifying \
                     product lines.",
    },
    Template {
        direction: Direction::NewRisk,
        rule_id: RuleId::RegulatoryRisk,
        headline: "New Regulatory Development",
        action_tip: "Review the referenced bulletins for HSN {hsn} and verify compliance \
                     before the next shipment.",
    },
];

const FALLBACK_HEADLINE: &str = "Market Movement Detected";
const FALLBACK_TIP: &str =
    "Review recent market signals for HSN {hsn} and adjust plans accordingly.";

/// Compose an alert from a winning trend candidate.
///
/// Pure and deterministic: the `alert_id` depends only on the candidate's
/// code, window and rule, so repeated passes over the same situation
/// reproduce the same identity.
#[must_use]
pub fn compose(candidate: &TrendCandidate, now: DateTime<Utc>) -> Alert {
    let (headline, tip) = TEMPLATES
        .iter()
        .find(|t| t.direction == candidate.direction && t.rule_id == candidate.rule_id)
        .map_or((FALLBACK_HEADLINE, FALLBACK_TIP), |t| {
            (t.headline, t.action_tip)
        });

    Alert {
        alert_id: alert_id(
            &candidate.hsn_code,
            candidate.window_start,
            candidate.window_end,
            candidate.rule_id,
        ),
        hsn_code: candidate.hsn_code.clone(),
        headline: headline.to_string(),
        action_tip: tip.replace("{hsn}", &candidate.hsn_code),
        confidence: candidate.confidence,
        sources: candidate.supporting_signal_ids.clone(),
        created_at: now,
    }
}
