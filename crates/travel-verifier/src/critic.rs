//! Critic phase: an LLM pass that flags issues the rule phase's fixed
//! tables miss (spec §4.4.7).

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use travel_core::category::slot_for_time;
use travel_core::collaborators::LlmClient;
use travel_protocol::verification::{IssueSeverity, VerificationIssue};

const SCHEMA_SYSTEM_PROMPT: &str = "You review a travel itinerary for time-of-day mistakes (e.g. a bar scheduled at breakfast, a sunrise viewpoint scheduled at night). Respond with JSON: {\"issues\": [{\"day\": int, \"spot_name\": string, \"problem\": string, \"severity\": \"warning\"|\"error\", \"suggested_slot\": string}]}. Only report genuine mismatches.";

pub async fn check(llm: &dyn LlmClient, itinerary: &Value, already_reported: &HashSet<(String, u32)>) -> Vec<VerificationIssue> {
    let prompt = format!("Itinerary: {}", serde_json::to_string(itinerary).unwrap_or_default());

    let Ok(value) = llm.extract_json(&prompt, Some(SCHEMA_SYSTEM_PROMPT)).await else {
        return Vec::new();
    };

    let Some(raw_issues) = value.get("issues").and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    raw_issues
        .iter()
        .filter_map(|raw| {
            let day = raw.get("day").and_then(|v| v.as_u64())? as u32;
            let spot_name = raw.get("spot_name").and_then(|v| v.as_str())?.to_string();
            if already_reported.contains(&(spot_name.clone(), day)) {
                return None;
            }
            let severity = match raw.get("severity").and_then(|v| v.as_str()) {
                Some("error") => IssueSeverity::Error,
                _ => IssueSeverity::Warning,
            };
            let suggested_slot = raw.get("suggested_slot").and_then(|v| v.as_str()).map(str::to_string);
            let current_slot = raw
                .get("current_time")
                .and_then(|v| v.as_str())
                .map(|t| slot_for_time(t).as_str().to_string())
                .unwrap_or_default();

            Some(VerificationIssue {
                issue_type: "critic_flagged".to_string(),
                spot_id: spot_name.clone(),
                spot_name,
                current_slot,
                expected_slots: suggested_slot.clone().into_iter().collect(),
                day,
                severity,
                reason: raw.get("problem").and_then(|v| v.as_str()).unwrap_or("flagged by critic").to_string(),
                suggested_fix: suggested_slot,
            })
        })
        .collect()
}

/// Should the critic phase run at all: always when the rule phase already
/// found something, otherwise only for itineraries spanning more than 2 days.
pub fn should_run(itinerary: &Value, rule_issues_found: bool) -> bool {
    if rule_issues_found {
        return true;
    }
    itinerary.get("days").and_then(|d| d.as_array()).map(|d| d.len() > 2).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_when_rule_phase_found_issues() {
        let itinerary = serde_json::json!({"days": [{"day": 1}]});
        assert!(should_run(&itinerary, true));
    }

    #[test]
    fn runs_for_long_itineraries_even_without_issues() {
        let itinerary = serde_json::json!({"days": [{"day": 1}, {"day": 2}, {"day": 3}]});
        assert!(should_run(&itinerary, false));
    }

    #[test]
    fn skips_short_clean_itineraries() {
        let itinerary = serde_json::json!({"days": [{"day": 1}, {"day": 2}]});
        assert!(!should_run(&itinerary, false));
    }
}
