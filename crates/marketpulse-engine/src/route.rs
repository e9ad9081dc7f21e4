//! Alert routing: pure set-membership matching of alerts to MSME profiles.
//!
//! The router is re-run each pass over the full alert set; it keeps no
//! queue state. Idempotency comes from deduplicating on
//! `(alert_id, profile_id)` — content-derived alert identity makes the
//! same situation route identically across passes.

use std::collections::HashSet;

use marketpulse_core::{MsmeProfile, Taxonomy};

use crate::types::{Alert, Delivery};

/// The coarse industry-group membership predicate the router consults for
/// profiles that opted into "all codes in my industry". Supplied by the
/// taxonomy collaborator; the router only needs the boolean.
pub trait IndustryMembership {
    fn contains(&self, industry: &str, hsn_code: &str) -> bool;
}

impl IndustryMembership for Taxonomy {
    fn contains(&self, industry: &str, hsn_code: &str) -> bool {
        self.industry_of(hsn_code) == Some(industry)
    }
}

fn profile_matches(
    alert: &Alert,
    profile: &MsmeProfile,
    membership: &dyn IndustryMembership,
) -> bool {
    if profile.hsn_codes.contains(&alert.hsn_code) {
        return true;
    }
    if profile.all_codes_in_industry {
        if let Some(industry) = &profile.industry {
            return membership.contains(industry, &alert.hsn_code);
        }
    }
    false
}

/// Route one alert against the profile table.
#[must_use]
pub fn route(
    alert: &Alert,
    profiles: &[MsmeProfile],
    membership: &dyn IndustryMembership,
) -> Vec<Delivery> {
    profiles
        .iter()
        .filter(|p| profile_matches(alert, p, membership))
        .map(|p| Delivery {
            profile_id: p.profile_id.clone(),
            alert: alert.clone(),
        })
        .collect()
}

/// Route an ordered alert set, deduplicating `(alert_id, profile_id)`
/// pairs. Alert order (ranker order) is preserved; within one alert,
/// profile-table order is preserved.
#[must_use]
pub fn route_all(
    alerts: &[Alert],
    profiles: &[MsmeProfile],
    membership: &dyn IndustryMembership,
) -> Vec<Delivery> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut deliveries = Vec::new();
    for alert in alerts {
        for delivery in route(alert, profiles, membership) {
            let key = (delivery.alert.alert_id.clone(), delivery.profile_id.clone());
            if seen.insert(key) {
                deliveries.push(delivery);
            }
        }
    }
    deliveries
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use marketpulse_core::TaxonomyEntry;

    use super::*;

    fn taxonomy() -> Taxonomy {
        Taxonomy::from_entries(vec![
            TaxonomyEntry {
                hsn_code: "6101".to_string(),
                industry: "Textile & Apparel".to_string(),
                keywords: vec!["knitted apparel".to_string()],
            },
            TaxonomyEntry {
                hsn_code: "6109".to_string(),
                industry: "Textile & Apparel".to_string(),
                keywords: vec!["t-shirts".to_string()],
            },
            TaxonomyEntry {
                hsn_code: "1006".to_string(),
                industry: "Food Processing".to_string(),
                keywords: vec!["rice".to_string()],
            },
        ])
        .unwrap()
    }

    fn alert(code: &str) -> Alert {
        Alert {
            alert_id: format!("alert-{code}"),
            hsn_code: code.to_string(),
            headline: "Strong Demand Increase".to_string(),
            action_tip: "Consider increasing stock".to_string(),
            confidence: 0.9,
            sources: vec![],
            created_at: Utc.with_ymd_and_hms(2025, 11, 23, 0, 0, 0).unwrap(),
        }
    }

    fn profile(id: &str, codes: &[&str]) -> MsmeProfile {
        MsmeProfile {
            profile_id: id.to_string(),
            enterprise_name: format!("{id} Pvt Ltd"),
            hsn_codes: codes.iter().map(|c| (*c).to_string()).collect(),
            region: "Surat".to_string(),
            language_preference: "en".to_string(),
            industry: None,
            all_codes_in_industry: false,
        }
    }

    #[test]
    fn matching_profile_always_receives_non_matching_never() {
        let profiles = vec![profile("p-1006", &["1006"]), profile("p-2001", &["2001"])];
        let deliveries = route(&alert("1006"), &profiles, &taxonomy());
        let ids: Vec<&str> = deliveries.iter().map(|d| d.profile_id.as_str()).collect();
        assert_eq!(ids, vec!["p-1006"]);
    }

    #[test]
    fn industry_opt_in_matches_sibling_codes() {
        let mut p = profile("p-textile", &["6101"]);
        p.industry = Some("Textile & Apparel".to_string());
        p.all_codes_in_industry = true;
        let profiles = vec![p];

        // 6109 is not in the profile's explicit set, but shares the industry.
        let deliveries = route(&alert("6109"), &profiles, &taxonomy());
        assert_eq!(deliveries.len(), 1);

        // A code from another industry still does not match.
        let deliveries = route(&alert("1006"), &profiles, &taxonomy());
        assert!(deliveries.is_empty());
    }

    #[test]
    fn route_all_dedups_repeated_alert_profile_pairs() {
        let profiles = vec![profile("p-1006", &["1006"])];
        let duplicated = vec![alert("1006"), alert("1006")];
        let deliveries = route_all(&duplicated, &profiles, &taxonomy());
        assert_eq!(
            deliveries.len(),
            1,
            "routing the same alert_id twice must not duplicate the delivery task"
        );
    }

    #[test]
    fn route_all_preserves_ranker_order() {
        let profiles = vec![profile("p-all", &["1006", "6101"])];
        let alerts = vec![alert("6101"), alert("1006")];
        let deliveries = route_all(&alerts, &profiles, &taxonomy());
        let codes: Vec<&str> = deliveries.iter().map(|d| d.alert.hsn_code.as_str()).collect();
        assert_eq!(codes, vec!["6101", "1006"]);
    }

    #[test]
    fn alert_routed_to_zero_profiles_is_fine() {
        let deliveries = route(&alert("9999"), &[], &taxonomy());
        assert!(deliveries.is_empty());
    }
}
