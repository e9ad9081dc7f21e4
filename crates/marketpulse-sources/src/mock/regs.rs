//! Mock regulatory-bulletin feed.
//!
//! Bulletins name their HSN codes explicitly, the way official circulars
//! do, so the batch bypasses the classifier. Severity is a unit magnitude;
//! the regulatory rule keys on presence, not size.

use chrono::{DateTime, Duration, Utc};
use marketpulse_engine::ingest::{RawRecord, SourceBatch, SourceSchema};
use marketpulse_engine::types::SignalKind;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::mock::CATALOG;
use crate::{Feed, FeedError};

const SOURCE_ID: &str = "mock-regs";

const BULLETIN_TEMPLATES: &[&str] = &[
    "New packaging and labelling norms notified for {product}",
    "Quality control order extended to cover {product}",
    "Revised import documentation required for {product}",
];

pub struct MockRegulatoryFeed {
    seed: u64,
    days: u32,
    now: DateTime<Utc>,
}

impl MockRegulatoryFeed {
    #[must_use]
    pub fn new(seed: u64, days: u32, now: DateTime<Utc>) -> Self {
        Self { seed, days, now }
    }

    fn schema() -> SourceSchema {
        SourceSchema {
            source_id: SOURCE_ID.to_string(),
            kind: SignalKind::Regulatory,
            timestamp_field: "published".to_string(),
            value_field: "severity".to_string(),
            text_field: Some("summary".to_string()),
            hsn_code_field: Some("hsn".to_string()),
        }
    }
}

impl Feed for MockRegulatoryFeed {
    fn source_id(&self) -> &str {
        SOURCE_ID
    }

    fn fetch(&self) -> Result<SourceBatch, FeedError> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        // Bulletins are sparse: a couple over the whole span.
        let count = rng.random_range(1..=3);
        let mut records = Vec::new();
        for _ in 0..count {
            let entry = &CATALOG[rng.random_range(0..CATALOG.len())];
            let template = BULLETIN_TEMPLATES[rng.random_range(0..BULLETIN_TEMPLATES.len())];
            let day_offset = rng.random_range(1..=i64::from(self.days.max(1)));
            let published = self.now - Duration::days(day_offset);
            records.push(
                RawRecord::new()
                    .with_text("published", published.format("%Y-%m-%d").to_string())
                    .with_number("severity", 1.0)
                    .with_text("summary", template.replace("{product}", entry.product))
                    .with_text("hsn", entry.hsn_code),
            );
        }
        Ok(SourceBatch {
            schema: Self::schema(),
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 23, 6, 0, 0).unwrap()
    }

    #[test]
    fn bulletins_carry_explicit_codes() {
        let batch = MockRegulatoryFeed::new(3, 30, now()).fetch().unwrap();
        assert!(!batch.records.is_empty());
        for record in &batch.records {
            let code = record.get("hsn").and_then(|v| v.as_text()).unwrap();
            assert!(CATALOG.iter().any(|e| e.hsn_code == code));
        }
    }

    #[test]
    fn same_seed_reproduces_the_same_bulletins() {
        let a = MockRegulatoryFeed::new(3, 30, now()).fetch().unwrap();
        let b = MockRegulatoryFeed::new(3, 30, now()).fetch().unwrap();
        assert_eq!(a.records.len(), b.records.len());
        for (ra, rb) in a.records.iter().zip(&b.records) {
            assert_eq!(ra.fields, rb.fields);
        }
    }
}
