//! The `run` command: one full pipeline pass over the mock feeds.

use chrono::{DateTime, Utc};
use marketpulse_core::AppConfig;
use marketpulse_engine::store::MemorySignalStore;
use marketpulse_engine::{Engine, EngineConfig};
use marketpulse_sources::mock::{MockNewsFeed, MockRegulatoryFeed, MockTrendsFeed};
use marketpulse_sources::{collect_batches, Feed};

use crate::deliver::{self, PassthroughTranslator};

/// The demo feed set. The span reaches one lookback behind the scoring
/// window so the threshold rule has a trailing baseline to compare against.
pub(crate) fn demo_feeds(seed: u64, config: &AppConfig, now: DateTime<Utc>) -> Vec<Box<dyn Feed>> {
    let days = config.lookback_days * 2;
    vec![
        Box::new(MockTrendsFeed::new(seed, days, now)),
        Box::new(MockNewsFeed::new(seed.wrapping_add(1), days, now)),
        Box::new(MockRegulatoryFeed::new(seed.wrapping_add(2), days, now)),
    ]
}

pub(crate) async fn run_once(
    config: &AppConfig,
    seed: u64,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let taxonomy = marketpulse_core::Taxonomy::load(&config.taxonomy_path)?;
    let profiles = marketpulse_core::load_profiles(&config.profiles_path)?;
    let engine = Engine::new(taxonomy, EngineConfig::from(config));

    let mut store = MemorySignalStore::new();
    let batches = {
        let feeds = demo_feeds(seed, config, now);
        collect_batches(&feeds)
    };
    let mut accepted = 0;
    let mut rejected = 0;
    for batch in &batches {
        let summary = engine.ingest(&mut store, batch, now);
        accepted += summary.accepted;
        rejected += summary.rejected;
    }

    let report = engine.run_pass(&mut store, &profiles, now).await?;
    let written = deliver::write_deliveries(
        &config.out_path,
        &report.deliveries,
        &profiles,
        &PassthroughTranslator,
    )?;

    println!(
        "pass {}: {accepted} signals in ({rejected} rejected), {} partitions, \
         {} candidates, {} alerts",
        report.pass_id,
        report.partitions,
        report.candidates_total,
        report.alerts.len()
    );
    for alert in &report.alerts {
        println!(
            "  {:.2}  HSN {}  {}",
            alert.confidence, alert.hsn_code, alert.headline
        );
    }
    println!("{written} deliveries appended to {}", config.out_path.display());
    Ok(())
}
