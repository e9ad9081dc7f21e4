//! Domain types shared across the engine: signals, trend candidates, alerts
//! and deliveries. Alert identity is content-derived so repeated passes over
//! the same window reproduce the same ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// What a signal's magnitude measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Demand,
    Supply,
    Regulatory,
    Price,
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalKind::Demand => write!(f, "demand"),
            SignalKind::Supply => write!(f, "supply"),
            SignalKind::Regulatory => write!(f, "regulatory"),
            SignalKind::Price => write!(f, "price"),
        }
    }
}

/// One normalized, timestamped market observation. Immutable once created;
/// evicted from the window store when older than the lookback horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    /// Provenance identifier, e.g. `mock-news`.
    pub source_id: String,
    /// HSN code, or `None` when classification found no match.
    pub hsn_code: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Magnitude; semantics depend on the source (search-interest index,
    /// sentiment score, mention count). Always finite.
    pub value: f64,
    /// Original text retained for audit, when the source had one.
    pub raw_text: Option<String>,
    pub kind: SignalKind,
}

impl Signal {
    /// Stable per-signal reference used in rationales and provenance lists.
    #[must_use]
    pub fn signal_id(&self) -> String {
        format!("{}:{}", self.source_id, self.timestamp.format("%Y-%m-%dT%H:%M:%SZ"))
    }
}

/// Trend direction asserted by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    NewRisk,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::NewRisk => write!(f, "new_risk"),
        }
    }
}

/// The closed set of built-in scoring rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    DemandThreshold,
    SustainedDirection,
    RegulatoryRisk,
}

impl RuleId {
    /// Every rule, in evaluation order.
    #[must_use]
    pub fn all() -> [RuleId; 3] {
        [
            RuleId::RegulatoryRisk,
            RuleId::DemandThreshold,
            RuleId::SustainedDirection,
        ]
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RuleId::DemandThreshold => "demand_threshold",
            RuleId::SustainedDirection => "sustained_direction",
            RuleId::RegulatoryRisk => "regulatory_risk",
        }
    }

    /// Tie-break priority for the ranker: lower wins. Reflects certainty of
    /// the rule's evidence, not importance of the alert.
    #[must_use]
    pub fn priority(self) -> u8 {
        match self {
            RuleId::RegulatoryRisk => 0,
            RuleId::DemandThreshold => 1,
            RuleId::SustainedDirection => 2,
        }
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scored, not-yet-finalized trend hypothesis for one (HSN code, rule)
/// pair. Consumed by the ranker; only winners survive into alerts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendCandidate {
    pub hsn_code: String,
    pub rule_id: RuleId,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub direction: Direction,
    /// In `[0, 1]`; a deterministic function of the rule's input signals.
    pub confidence: f64,
    /// Contributing signal references plus a plain-language explanation.
    /// Never empty for a well-formed candidate.
    pub rationale: Vec<String>,
    pub supporting_signal_ids: Vec<String>,
}

/// The user-facing alert unit, still language-neutral. Never mutated after
/// creation; a changed situation produces a new alert with a new window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub alert_id: String,
    pub hsn_code: String,
    pub headline: String,
    pub action_tip: String,
    pub confidence: f64,
    /// Provenance: contributing signal references.
    pub sources: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// One routed delivery task: this alert goes to this profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    pub profile_id: String,
    pub alert: Alert,
}

/// Content-derived alert identity: hex-truncated SHA-256 over the fields
/// that define the alert's situation. Reproducible across passes and
/// process restarts, which is what makes delivery dedup idempotent.
#[must_use]
pub fn alert_id(
    hsn_code: &str,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    rule_id: RuleId,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(hsn_code.as_bytes());
    hasher.update(b"|");
    hasher.update(window_start.timestamp().to_be_bytes());
    hasher.update(b"|");
    hasher.update(window_end.timestamp().to_be_bytes());
    hasher.update(b"|");
    hasher.update(rule_id.as_str().as_bytes());
    let digest = hasher.finalize();
    let mut id = String::with_capacity(32);
    for byte in &digest[..16] {
        use std::fmt::Write;
        let _ = write!(id, "{byte:02x}");
    }
    id
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn signal_id_combines_source_and_timestamp() {
        let signal = Signal {
            source_id: "mock-news".to_string(),
            hsn_code: Some("1006".to_string()),
            timestamp: Utc.with_ymd_and_hms(2025, 11, 23, 0, 0, 0).unwrap(),
            value: 1.0,
            raw_text: None,
            kind: SignalKind::Demand,
        };
        assert_eq!(signal.signal_id(), "mock-news:2025-11-23T00:00:00Z");
    }

    #[test]
    fn alert_id_is_stable_for_identical_inputs() {
        let start = Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 11, 30, 0, 0, 0).unwrap();
        let a = alert_id("1006", start, end, RuleId::DemandThreshold);
        let b = alert_id("1006", start, end, RuleId::DemandThreshold);
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn alert_id_differs_across_constituent_fields() {
        let start = Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 11, 30, 0, 0, 0).unwrap();
        let base = alert_id("1006", start, end, RuleId::DemandThreshold);
        assert_ne!(base, alert_id("2001", start, end, RuleId::DemandThreshold));
        assert_ne!(base, alert_id("1006", start, end, RuleId::RegulatoryRisk));
        let later = Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap();
        assert_ne!(base, alert_id("1006", start, later, RuleId::DemandThreshold));
    }

    #[test]
    fn rule_priority_reflects_certainty_order() {
        assert!(RuleId::RegulatoryRisk.priority() < RuleId::DemandThreshold.priority());
        assert!(RuleId::DemandThreshold.priority() < RuleId::SustainedDirection.priority());
    }

    #[test]
    fn alert_serializes_to_wire_shape() {
        let alert = Alert {
            alert_id: "abc123".to_string(),
            hsn_code: "1006".to_string(),
            headline: "Strong Demand Increase".to_string(),
            confidence: 0.9,
            action_tip: "Consider increasing stock".to_string(),
            sources: vec!["mock-news:2025-11-23T00:00:00Z".to_string()],
            created_at: Utc.with_ymd_and_hms(2025, 11, 23, 0, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["hsn_code"], "1006");
        assert_eq!(json["headline"], "Strong Demand Increase");
        assert!(json["created_at"].as_str().unwrap().starts_with("2025-11-23T00:00:00"));
    }
}
