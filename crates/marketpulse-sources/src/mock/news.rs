//! Mock news-headline feed.
//!
//! Headlines are built from a small template vocabulary over the demo
//! catalog. The batch carries no explicit HSN codes; the engine's
//! classifier maps headline text onto the taxonomy, which is exactly what a
//! production news adapter would rely on. Magnitudes come from the lexicon
//! scorer.

use chrono::{DateTime, Duration, Utc};
use marketpulse_engine::ingest::{RawRecord, SourceBatch, SourceSchema};
use marketpulse_engine::types::SignalKind;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::mock::CATALOG;
use crate::scorer::lexicon_score;
use crate::{Feed, FeedError};

const SOURCE_ID: &str = "mock-news";

/// Headline templates. `{product}` is replaced with a catalog phrase.
const HEADLINE_TEMPLATES: &[&str] = &[
    "{product} exports surge to record high",
    "Orders for {product} rising across tier-2 clusters",
    "Strong festive demand lifts {product} shipments",
    "{product} sector faces input shortage",
    "Import duty review weighs on {product} makers",
    "Buyers report oversupply in {product} market",
];

pub struct MockNewsFeed {
    seed: u64,
    days: u32,
    now: DateTime<Utc>,
}

impl MockNewsFeed {
    #[must_use]
    pub fn new(seed: u64, days: u32, now: DateTime<Utc>) -> Self {
        Self { seed, days, now }
    }

    fn schema() -> SourceSchema {
        SourceSchema {
            source_id: SOURCE_ID.to_string(),
            kind: SignalKind::Demand,
            timestamp_field: "published".to_string(),
            value_field: "sentiment".to_string(),
            text_field: Some("headline".to_string()),
            hsn_code_field: None,
        }
    }
}

impl Feed for MockNewsFeed {
    fn source_id(&self) -> &str {
        SOURCE_ID
    }

    fn fetch(&self) -> Result<SourceBatch, FeedError> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut records = Vec::new();
        for day_offset in (1..=self.days).rev() {
            let published = self.now - Duration::days(i64::from(day_offset));
            // A couple of stories a day across the catalog.
            for _ in 0..rng.random_range(1..=3) {
                let entry = &CATALOG[rng.random_range(0..CATALOG.len())];
                let template = HEADLINE_TEMPLATES[rng.random_range(0..HEADLINE_TEMPLATES.len())];
                let headline = template.replace("{product}", entry.product);
                let sentiment = lexicon_score(&headline);
                records.push(
                    RawRecord::new()
                        .with_text("published", published.format("%Y-%m-%d").to_string())
                        .with_number("sentiment", sentiment)
                        .with_text("headline", headline),
                );
            }
        }
        Ok(SourceBatch {
            schema: Self::schema(),
            records,
        })
    }
}
