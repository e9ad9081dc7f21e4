//! The ingestion boundary contract. External collaborators (scrapers,
//! search-trend clients, mock feeds) hand the engine batches of loosely
//! structured records plus a schema describing where the timestamp,
//! magnitude and text live. The engine never fetches data itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::SignalKind;

/// A loosely typed field value as produced by a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    Number(f64),
}

impl RawValue {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            RawValue::Number(_) => None,
        }
    }

    /// Numeric view; numeric strings are accepted since loosely structured
    /// sources frequently quote their numbers.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

/// One raw record from a source, prior to normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub fields: BTreeMap<String, RawValue>,
}

impl RawRecord {
    #[must_use]
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_text(mut self, field: &str, value: impl Into<String>) -> Self {
        self.fields
            .insert(field.to_string(), RawValue::Text(value.into()));
        self
    }

    #[must_use]
    pub fn with_number(mut self, field: &str, value: f64) -> Self {
        self.fields
            .insert(field.to_string(), RawValue::Number(value));
        self
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.fields.get(field)
    }
}

impl Default for RawRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Field layout declared by a source: which fields carry the timestamp and
/// magnitude, plus the optional text and explicit-code fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSchema {
    /// Provenance identifier stamped onto every signal from this source.
    pub source_id: String,
    /// Signal kind every record from this source normalizes to.
    pub kind: SignalKind,
    /// Field holding an RFC 3339 or `YYYY-MM-DD` timestamp.
    pub timestamp_field: String,
    /// Field holding the numeric magnitude.
    pub value_field: String,
    /// Optional field with the original free text, kept for audit and used
    /// for classification when no explicit code is present.
    pub text_field: Option<String>,
    /// Optional field carrying an explicit HSN code.
    pub hsn_code_field: Option<String>,
}

/// A batch of raw records from one source, as handed across the ingestion
/// boundary.
#[derive(Debug, Clone)]
pub struct SourceBatch {
    pub schema: SourceSchema,
    pub records: Vec<RawRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_value_numeric_string_parses() {
        assert_eq!(RawValue::Text("42.5".to_string()).as_number(), Some(42.5));
        assert_eq!(RawValue::Text("n/a".to_string()).as_number(), None);
        assert_eq!(RawValue::Number(7.0).as_number(), Some(7.0));
    }

    #[test]
    fn raw_record_builder_sets_fields() {
        let record = RawRecord::new()
            .with_text("date", "2025-11-23")
            .with_number("interest", 81.0);
        assert_eq!(record.get("date").and_then(RawValue::as_text), Some("2025-11-23"));
        assert_eq!(record.get("interest").and_then(RawValue::as_number), Some(81.0));
        assert!(record.get("missing").is_none());
    }
}
