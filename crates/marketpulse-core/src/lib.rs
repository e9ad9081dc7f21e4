//! Shared configuration for the MarketPulse engine: environment-driven
//! application settings plus the YAML-backed taxonomy and MSME profile
//! tables. Everything here is loaded once at startup and passed explicitly
//! into the engine — there is no ambient global state.

mod app_config;
mod config;
mod profiles;
mod taxonomy;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use profiles::{load_profiles, MsmeProfile, ProfilesFile};
pub use taxonomy::{Taxonomy, TaxonomyEntry, TaxonomyFile};

use thiserror::Error;

/// Configuration-level failures. These are fatal at startup: the engine
/// refuses to run a pass against a missing taxonomy or invalid thresholds.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read config file {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    FileParse(#[from] serde_yaml::Error),

    #[error("config validation failed: {0}")]
    Validation(String),
}
