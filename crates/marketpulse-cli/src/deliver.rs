//! Delivery rendering: routed alerts become JSON-lines records on disk.
//!
//! The file sink stands in for downstream notification channels. Records
//! pass through a [`Translator`] keyed by the profile's language
//! preference; the shipped translator is a pass-through so records stay
//! language-neutral until a real translation backend is plugged in.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use marketpulse_core::MsmeProfile;
use marketpulse_engine::types::Delivery;
use serde::Serialize;

/// Localization seam for user-facing alert text.
pub(crate) trait Translator {
    fn translate(&self, text: &str, language: &str) -> String;
}

/// Identity translator: returns the text unchanged for every language.
pub(crate) struct PassthroughTranslator;

impl Translator for PassthroughTranslator {
    fn translate(&self, text: &str, _language: &str) -> String {
        text.to_string()
    }
}

#[derive(Debug, Serialize)]
struct DeliveryRecord<'a> {
    profile_id: &'a str,
    language: &'a str,
    alert_id: &'a str,
    hsn_code: &'a str,
    headline: String,
    action_tip: String,
    confidence: f64,
    sources: &'a [String],
    created_at: chrono::DateTime<chrono::Utc>,
}

/// Append delivery records to the JSONL sink, one object per line.
///
/// Returns the number of records written.
///
/// # Errors
///
/// Returns an error if the sink file cannot be opened or written, or a
/// record fails to serialize.
pub(crate) fn write_deliveries(
    path: &Path,
    deliveries: &[Delivery],
    profiles: &[MsmeProfile],
    translator: &dyn Translator,
) -> anyhow::Result<usize> {
    let languages: HashMap<&str, &str> = profiles
        .iter()
        .map(|p| (p.profile_id.as_str(), p.language_preference.as_str()))
        .collect();

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = BufWriter::new(file);
    for delivery in deliveries {
        let language = languages
            .get(delivery.profile_id.as_str())
            .copied()
            .unwrap_or("en");
        let record = DeliveryRecord {
            profile_id: &delivery.profile_id,
            language,
            alert_id: &delivery.alert.alert_id,
            hsn_code: &delivery.alert.hsn_code,
            headline: translator.translate(&delivery.alert.headline, language),
            action_tip: translator.translate(&delivery.alert.action_tip, language),
            confidence: delivery.alert.confidence,
            sources: &delivery.alert.sources,
            created_at: delivery.alert.created_at,
        };
        serde_json::to_writer(&mut writer, &record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(deliveries.len())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use marketpulse_engine::types::Alert;

    use super::*;

    fn delivery(profile_id: &str) -> Delivery {
        Delivery {
            profile_id: profile_id.to_string(),
            alert: Alert {
                alert_id: "abc123".to_string(),
                hsn_code: "1006".to_string(),
                headline: "Strong Demand Increase".to_string(),
                action_tip: "Consider increasing stock for HSN 1006.".to_string(),
                confidence: 0.9,
                sources: vec!["mock-trends:2025-11-20T00:00:00Z".to_string()],
                created_at: Utc.with_ymd_and_hms(2025, 11, 23, 6, 0, 0).unwrap(),
            },
        }
    }

    fn profile(id: &str, language: &str) -> MsmeProfile {
        MsmeProfile {
            profile_id: id.to_string(),
            enterprise_name: format!("{id} Pvt Ltd"),
            hsn_codes: std::iter::once("1006".to_string()).collect(),
            region: "Surat".to_string(),
            language_preference: language.to_string(),
            industry: None,
            all_codes_in_industry: false,
        }
    }

    #[test]
    fn writes_one_json_object_per_line() {
        let path = std::env::temp_dir().join(format!(
            "marketpulse-deliver-test-{}.jsonl",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let deliveries = vec![delivery("p-1"), delivery("p-2")];
        let profiles = vec![profile("p-1", "hi"), profile("p-2", "en")];
        let written =
            write_deliveries(&path, &deliveries, &profiles, &PassthroughTranslator).unwrap();
        assert_eq!(written, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["profile_id"], "p-1");
        assert_eq!(first["language"], "hi");
        assert_eq!(first["alert_id"], "abc123");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn appends_across_calls() {
        let path = std::env::temp_dir().join(format!(
            "marketpulse-deliver-append-{}.jsonl",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let profiles = vec![profile("p-1", "en")];
        write_deliveries(&path, &[delivery("p-1")], &profiles, &PassthroughTranslator).unwrap();
        write_deliveries(&path, &[delivery("p-1")], &profiles, &PassthroughTranslator).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);

        std::fs::remove_file(&path).unwrap();
    }
}
