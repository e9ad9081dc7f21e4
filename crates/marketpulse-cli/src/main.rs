mod deliver;
mod run;
mod watch;

use chrono::Utc;
use clap::{Parser, Subcommand};
use marketpulse_engine::classify::Classifier;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "marketpulse")]
#[command(about = "MarketPulse trend detection and alerting engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one pipeline pass over the mock feeds and write deliveries.
    Run {
        /// Seed for the mock feeds; the same seed reproduces the same pass.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Run passes on the configured cron schedule until interrupted.
    Watch {
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Classify a piece of free text against the taxonomy.
    Classify { text: String },
    /// Validate configuration, taxonomy and profiles without running a pass.
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = marketpulse_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { seed } => run::run_once(&config, seed, Utc::now()).await,
        Commands::Watch { seed } => watch::run_watch(config, seed).await,
        Commands::Classify { text } => classify(&config, &text),
        Commands::Check => check(&config),
    }
}

fn classify(config: &marketpulse_core::AppConfig, text: &str) -> anyhow::Result<()> {
    let taxonomy = marketpulse_core::Taxonomy::load(&config.taxonomy_path)?;
    let classifier = Classifier::new(&taxonomy, config.similarity_threshold);
    match classifier.classify(text) {
        Some(m) => {
            let industry = taxonomy.industry_of(&m.hsn_code).unwrap_or("unknown");
            println!("HSN {}  {industry}  (score {:.2})", m.hsn_code, m.score);
        }
        None => println!("no taxonomy match"),
    }
    Ok(())
}

fn check(config: &marketpulse_core::AppConfig) -> anyhow::Result<()> {
    let taxonomy = marketpulse_core::Taxonomy::load(&config.taxonomy_path)?;
    let profiles = marketpulse_core::load_profiles(&config.profiles_path)?;
    println!(
        "config ok: {} taxonomy entries, {} profiles, window {} days, schedule '{}'",
        taxonomy.len(),
        profiles.len(),
        config.lookback_days,
        config.watch_schedule
    );
    Ok(())
}
