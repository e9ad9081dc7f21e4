use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One HSN code with its classification keywords and industry group label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub hsn_code: String,
    /// Coarse industry group this code belongs to, e.g. "Textile & Apparel".
    pub industry: String,
    /// Keyword phrases used by the classifier for matching free text.
    pub keywords: Vec<String>,
}

/// On-disk shape of `config/taxonomy.yaml`.
#[derive(Debug, Deserialize)]
pub struct TaxonomyFile {
    pub entries: Vec<TaxonomyEntry>,
}

/// The static HSN taxonomy, loaded once per process lifetime. Reloading is
/// an explicit operation: call [`Taxonomy::load`] again and swap the value
/// at the owner; nothing here reloads on its own.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    entries: Vec<TaxonomyEntry>,
    by_code: BTreeMap<String, usize>,
}

impl Taxonomy {
    /// Load and validate the taxonomy from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or fails
    /// validation (duplicate codes, empty keyword sets, blank fields).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        let file: TaxonomyFile = serde_yaml::from_str(&content)?;
        Self::from_entries(file.entries)
    }

    /// Build a taxonomy from in-memory entries (used by tests and mocks).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` on duplicate codes, blank fields,
    /// or entries without keywords.
    pub fn from_entries(entries: Vec<TaxonomyEntry>) -> Result<Self, ConfigError> {
        validate_entries(&entries)?;
        let by_code = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.hsn_code.clone(), i))
            .collect();
        Ok(Self { entries, by_code })
    }

    #[must_use]
    pub fn entries(&self) -> &[TaxonomyEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, hsn_code: &str) -> Option<&TaxonomyEntry> {
        self.by_code.get(hsn_code).map(|&i| &self.entries[i])
    }

    /// Industry group label for a code, if the code is known.
    #[must_use]
    pub fn industry_of(&self, hsn_code: &str) -> Option<&str> {
        self.get(hsn_code).map(|e| e.industry.as_str())
    }

    /// All codes registered under an industry group label.
    #[must_use]
    pub fn codes_in_industry(&self, industry: &str) -> BTreeSet<&str> {
        self.entries
            .iter()
            .filter(|e| e.industry == industry)
            .map(|e| e.hsn_code.as_str())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_entries(entries: &[TaxonomyEntry]) -> Result<(), ConfigError> {
    if entries.is_empty() {
        return Err(ConfigError::Validation(
            "taxonomy must contain at least one entry".to_string(),
        ));
    }

    let mut seen_codes = HashSet::new();
    for entry in entries {
        if entry.hsn_code.trim().is_empty() {
            return Err(ConfigError::Validation(
                "taxonomy entry has an empty hsn_code".to_string(),
            ));
        }
        if entry.industry.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "taxonomy entry '{}' has an empty industry label",
                entry.hsn_code
            )));
        }
        if entry.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "taxonomy entry '{}' has no usable keywords",
                entry.hsn_code
            )));
        }
        if !seen_codes.insert(entry.hsn_code.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate hsn_code in taxonomy: '{}'",
                entry.hsn_code
            )));
        }
    }
    Ok(())
}
