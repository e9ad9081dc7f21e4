//! Mock search-interest feed.
//!
//! Emits one daily interest reading per catalog code over the requested
//! span. One code is given a late surge so a demo pass has a demand-surge
//! story to find.

use chrono::{DateTime, Duration, Utc};
use marketpulse_engine::ingest::{RawRecord, SourceBatch, SourceSchema};
use marketpulse_engine::types::SignalKind;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::mock::CATALOG;
use crate::{Feed, FeedError};

const SOURCE_ID: &str = "mock-trends";

/// Code whose interest ramps up over the final days of the span.
const SURGE_CODE: &str = "6101";
const SURGE_DAYS: u32 = 10;

pub struct MockTrendsFeed {
    seed: u64,
    days: u32,
    now: DateTime<Utc>,
}

impl MockTrendsFeed {
    #[must_use]
    pub fn new(seed: u64, days: u32, now: DateTime<Utc>) -> Self {
        Self { seed, days, now }
    }

    fn schema() -> SourceSchema {
        SourceSchema {
            source_id: SOURCE_ID.to_string(),
            kind: SignalKind::Demand,
            timestamp_field: "date".to_string(),
            value_field: "interest".to_string(),
            text_field: None,
            hsn_code_field: Some("hsn".to_string()),
        }
    }
}

impl Feed for MockTrendsFeed {
    fn source_id(&self) -> &str {
        SOURCE_ID
    }

    fn fetch(&self) -> Result<SourceBatch, FeedError> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut records = Vec::new();
        for entry in CATALOG {
            for day_offset in (1..=self.days).rev() {
                let date = self.now - Duration::days(i64::from(day_offset));
                let mut interest: f64 = rng.random_range(35.0..65.0);
                if entry.hsn_code == SURGE_CODE && day_offset <= SURGE_DAYS {
                    // Ramp toward roughly 3x the baseline band.
                    let ramp = f64::from(SURGE_DAYS - day_offset + 1) / f64::from(SURGE_DAYS);
                    interest += 100.0 * ramp;
                }
                records.push(
                    RawRecord::new()
                        .with_text("date", date.format("%Y-%m-%d").to_string())
                        .with_number("interest", (interest * 10.0).round() / 10.0)
                        .with_text("hsn", entry.hsn_code),
                );
            }
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
    fn same_seed_reproduces_the_same_batch() {
        let a = MockTrendsFeed::new(7, 30, now()).fetch().unwrap();
        let b = MockTrendsFeed::new(7, 30, now()).fetch().unwrap();
        assert_eq!(a.records.len(), b.records.len());
        for (ra, rb) in a.records.iter().zip(&b.records) {
            assert_eq!(ra.fields, rb.fields);
        }
    }

    #[test]
    fn one_record_per_code_per_day() {
        let batch = MockTrendsFeed::new(7, 14, now()).fetch().unwrap();
        assert_eq!(batch.records.len(), 14 * CATALOG.len());
    }

    #[test]
    fn surge_code_ends_well_above_the_baseline_band() {
        let batch = MockTrendsFeed::new(7, 30, now()).fetch().unwrap();
        let last_surge_value = batch
            .records
            .iter()
            .filter(|r| {
                r.get("hsn").and_then(|v| v.as_text()) == Some(SURGE_CODE)
            })
            .filter_map(|r| r.get("interest").and_then(|v| v.as_number()))
            .next_back()
            .unwrap();
        assert!(
            last_surge_value > 100.0,
            "expected surged interest, got {last_surge_value}"
        );
    }
}
