use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One MSME business profile, consumed read-only by the alert router. The
/// engine does not own profile lifecycle; this is the injected lookup table
/// loaded from `config/profiles.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MsmeProfile {
    pub profile_id: String,
    pub enterprise_name: String,
    /// HSN codes this business has registered interest in.
    #[serde(default)]
    pub hsn_codes: BTreeSet<String>,
    pub region: String,
    pub language_preference: String,
    /// Industry group label; required when `all_codes_in_industry` is set.
    #[serde(default)]
    pub industry: Option<String>,
    /// Opt-in to every code registered under `industry` in the taxonomy.
    #[serde(default)]
    pub all_codes_in_industry: bool,
}

/// On-disk shape of `config/profiles.yaml`.
#[derive(Debug, Deserialize)]
pub struct ProfilesFile {
    pub profiles: Vec<MsmeProfile>,
}

/// Load and validate the MSME profiles from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation (duplicate ids, profiles with no way to match any alert).
pub fn load_profiles(path: &Path) -> Result<Vec<MsmeProfile>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let file: ProfilesFile = serde_yaml::from_str(&content)?;
    validate_profiles(&file.profiles)?;
    Ok(file.profiles)
}

fn validate_profiles(profiles: &[MsmeProfile]) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();
    for profile in profiles {
        if profile.profile_id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "profile_id must be non-empty".to_string(),
            ));
        }
        if !seen_ids.insert(profile.profile_id.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate profile_id: '{}'",
                profile.profile_id
            )));
        }
        if profile.all_codes_in_industry && profile.industry.is_none() {
            return Err(ConfigError::Validation(format!(
                "profile '{}' opts into all industry codes but has no industry label",
                profile.profile_id
            )));
        }
        if profile.hsn_codes.is_empty() && !profile.all_codes_in_industry {
            return Err(ConfigError::Validation(format!(
                "profile '{}' has no hsn_codes and no industry opt-in; it can never match",
                profile.profile_id
            )));
        }
    }
    Ok(())
}
