use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or threshold validation fails.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or threshold validation fails.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let log_level = or_default("MARKETPULSE_LOG_LEVEL", "info");
    let taxonomy_path = PathBuf::from(or_default(
        "MARKETPULSE_TAXONOMY_PATH",
        "./config/taxonomy.yaml",
    ));
    let profiles_path = PathBuf::from(or_default(
        "MARKETPULSE_PROFILES_PATH",
        "./config/profiles.yaml",
    ));
    let out_path = PathBuf::from(or_default("MARKETPULSE_OUT_PATH", "./alerts.jsonl"));

    let lookback_days = parse_u32("MARKETPULSE_LOOKBACK_DAYS", "30")?;
    let baseline_len = parse_usize("MARKETPULSE_BASELINE_LEN", "10")?;
    let demand_multiple = parse_f64("MARKETPULSE_DEMAND_MULTIPLE", "1.5")?;
    let min_run = parse_usize("MARKETPULSE_MIN_RUN", "3")?;
    let max_reversals = parse_usize("MARKETPULSE_MAX_REVERSALS", "1")?;
    let similarity_threshold = parse_f64("MARKETPULSE_SIMILARITY_THRESHOLD", "0.5")?;
    let max_concurrent_partitions = parse_usize("MARKETPULSE_MAX_CONCURRENT_PARTITIONS", "4")?;
    let watch_schedule = or_default("MARKETPULSE_WATCH_SCHEDULE", "0 0 6 * * *");

    let config = AppConfig {
        log_level,
        taxonomy_path,
        profiles_path,
        out_path,
        lookback_days,
        baseline_len,
        demand_multiple,
        min_run,
        max_reversals,
        similarity_threshold,
        max_concurrent_partitions,
        watch_schedule,
    };

    validate_thresholds(&config)?;
    Ok(config)
}

/// Reject threshold combinations under which no valid scoring pass exists.
fn validate_thresholds(config: &AppConfig) -> Result<(), ConfigError> {
    if config.lookback_days == 0 {
        return Err(ConfigError::Validation(
            "MARKETPULSE_LOOKBACK_DAYS must be at least 1".to_string(),
        ));
    }
    if config.baseline_len == 0 {
        return Err(ConfigError::Validation(
            "MARKETPULSE_BASELINE_LEN must be at least 1".to_string(),
        ));
    }
    if config.demand_multiple <= 1.0 || !config.demand_multiple.is_finite() {
        return Err(ConfigError::Validation(format!(
            "MARKETPULSE_DEMAND_MULTIPLE must be a finite value above 1.0, got {}",
            config.demand_multiple
        )));
    }
    if config.min_run < 2 {
        return Err(ConfigError::Validation(
            "MARKETPULSE_MIN_RUN must be at least 2".to_string(),
        ));
    }
    if !(config.similarity_threshold > 0.0 && config.similarity_threshold <= 1.0) {
        return Err(ConfigError::Validation(format!(
            "MARKETPULSE_SIMILARITY_THRESHOLD must be in (0, 1], got {}",
            config.similarity_threshold
        )));
    }
    if config.max_concurrent_partitions == 0 {
        return Err(ConfigError::Validation(
            "MARKETPULSE_MAX_CONCURRENT_PARTITIONS must be at least 1".to_string(),
        ));
    }
    Ok(())
}
