//! Raw record → [`Signal`] normalization.
//!
//! Rejection is a value, not an error: a malformed record yields
//! [`Rejected`] so the caller can count and skip it without halting the
//! batch. Classification misses are not rejections — an unclassified
//! signal still carries demand/risk information and is retained.

use chrono::{DateTime, NaiveDate, Utc};

use crate::classify::Classifier;
use crate::ingest::{RawRecord, RawValue, SourceSchema};
use crate::types::Signal;

/// Why a raw record was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    MissingField(String),
    UnparsableTimestamp(String),
    FutureTimestamp(String),
    UnparsableValue(String),
    NonFiniteValue,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::MissingField(field) => write!(f, "missing field '{field}'"),
            RejectReason::UnparsableTimestamp(raw) => {
                write!(f, "unparsable timestamp '{raw}'")
            }
            RejectReason::FutureTimestamp(raw) => {
                write!(f, "timestamp '{raw}' is in the future")
            }
            RejectReason::UnparsableValue(raw) => {
                write!(f, "unparsable magnitude '{raw}'")
            }
            RejectReason::NonFiniteValue => write!(f, "magnitude is not finite"),
        }
    }
}

/// A skipped record with its reason. Counted in the pass report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub reason: RejectReason,
}

impl std::fmt::Display for Rejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

fn reject(reason: RejectReason) -> Rejected {
    Rejected { reason }
}

/// Normalize one raw record against its source schema.
///
/// Invokes the classifier when the record carries no explicit HSN code; a
/// classifier miss yields `hsn_code = None`, never a rejection.
///
/// # Errors
///
/// Returns [`Rejected`] for missing required fields, unparsable or future
/// timestamps, and unparsable or non-finite magnitudes.
pub fn normalize(
    record: &RawRecord,
    schema: &SourceSchema,
    classifier: &Classifier,
    now: DateTime<Utc>,
) -> Result<Signal, Rejected> {
    let raw_timestamp = record
        .get(&schema.timestamp_field)
        .and_then(RawValue::as_text)
        .ok_or_else(|| reject(RejectReason::MissingField(schema.timestamp_field.clone())))?;

    let timestamp = parse_timestamp(raw_timestamp)
        .ok_or_else(|| reject(RejectReason::UnparsableTimestamp(raw_timestamp.to_string())))?;
    if timestamp > now {
        return Err(reject(RejectReason::FutureTimestamp(
            raw_timestamp.to_string(),
        )));
    }

    let raw_value = record
        .get(&schema.value_field)
        .ok_or_else(|| reject(RejectReason::MissingField(schema.value_field.clone())))?;
    let value = raw_value.as_number().ok_or_else(|| {
        let raw = raw_value.as_text().unwrap_or_default().to_string();
        reject(RejectReason::UnparsableValue(raw))
    })?;
    if !value.is_finite() {
        return Err(reject(RejectReason::NonFiniteValue));
    }

    let raw_text = schema
        .text_field
        .as_ref()
        .and_then(|f| record.get(f))
        .and_then(RawValue::as_text)
        .map(ToString::to_string);

    let explicit_code = schema
        .hsn_code_field
        .as_ref()
        .and_then(|f| record.get(f))
        .and_then(RawValue::as_text)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToString::to_string);

    let hsn_code = match explicit_code {
        Some(code) => Some(code),
        None => raw_text
            .as_deref()
            .and_then(|text| classifier.classify(text))
            .map(|m| m.hsn_code),
    };

    Ok(Signal {
        source_id: schema.source_id.clone(),
        hsn_code,
        timestamp,
        value,
        raw_text,
        kind: schema.kind,
    })
}

/// Accepts RFC 3339 instants or bare `YYYY-MM-DD` dates (midnight UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
