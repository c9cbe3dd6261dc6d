//! Rule phase: time-slot and name-pattern checks against an itinerary's raw
//! JSON (spec §4.4.7).

use serde_json::Value;
use std::collections::HashSet;

use travel_core::category::{allowed_slots_for_category, allowed_slots_for_name, slot_for_time};
use travel_protocol::verification::{IssueSeverity, VerificationIssue};

pub fn check(itinerary: &Value) -> Vec<VerificationIssue> {
    let mut issues = Vec::new();
    let mut errored: HashSet<(String, u32)> = HashSet::new();

    let Some(days) = itinerary.get("days").and_then(|d| d.as_array()) else {
        return issues;
    };

    for day_value in days {
        let day = day_value.get("day").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
        let Some(activities) = day_value.get("activities").and_then(|a| a.as_array()) else {
            continue;
        };

        for activity in activities {
            let name = activity.get("location").and_then(|v| v.as_str()).unwrap_or("unknown");
            let time = activity.get("time").and_then(|v| v.as_str()).unwrap_or("12:00");
            let category = activity.get("category").and_then(|v| v.as_str()).unwrap_or("spot");
            let spot_id = activity.get("id").and_then(|v| v.as_str()).map(str::to_string).unwrap_or_else(|| name.to_string());
            let current = slot_for_time(time);

            let category_slots = allowed_slots_for_category(category);
            let category_constrains = category_slots.len() < 6;

            if category_constrains && !category_slots.contains(&current) {
                issues.push(VerificationIssue {
                    issue_type: "time_of_day_mismatch".to_string(),
                    spot_id: spot_id.clone(),
                    spot_name: name.to_string(),
                    current_slot: current.as_str().to_string(),
                    expected_slots: category_slots.iter().map(|s| s.as_str().to_string()).collect(),
                    day,
                    severity: IssueSeverity::Error,
                    reason: format!("'{name}' is scheduled at {time} but its category '{category}' belongs in a different slot"),
                    suggested_fix: None,
                });
                errored.insert((spot_id.clone(), day));
                continue;
            }

            if !category_constrains {
                if let Some(name_slots) = allowed_slots_for_name(name) {
                    if !name_slots.contains(&current) {
                        issues.push(VerificationIssue {
                            issue_type: "time_of_day_mismatch".to_string(),
                            spot_id: spot_id.clone(),
                            spot_name: name.to_string(),
                            current_slot: current.as_str().to_string(),
                            expected_slots: name_slots.iter().map(|s| s.as_str().to_string()).collect(),
                            day,
                            severity: IssueSeverity::Error,
                            reason: format!("'{name}' is scheduled at {time} but its name suggests a different time of day"),
                            suggested_fix: None,
                        });
                        errored.insert((spot_id.clone(), day));
                        continue;
                    }
                }
            }

            if let Some(best) = activity.get("best_visit_time").and_then(|v| v.as_str()) {
                let best_slot = slot_for_time(best);
                if best_slot != current && !errored.contains(&(spot_id.clone(), day)) {
                    issues.push(VerificationIssue {
                        issue_type: "best_time_deviation".to_string(),
                        spot_id: spot_id.clone(),
                        spot_name: name.to_string(),
                        current_slot: current.as_str().to_string(),
                        expected_slots: vec![best_slot.as_str().to_string()],
                        day,
                        severity: IssueSeverity::Warning,
                        reason: format!("'{name}' usually visited around {best}"),
                        suggested_fix: None,
                    });
                }
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_category_mismatch() {
        let itinerary = serde_json::json!({
            "days": [{
                "day": 1,
                "activities": [{"time": "08:00", "location": "Sky Bar 36", "category": "bar"}],
            }]
        });
        let issues = check(&itinerary);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, "time_of_day_mismatch");
        assert_eq!(issues[0].severity, IssueSeverity::Error);
    }

    #[test]
    fn category_match_short_circuits_name_check() {
        let itinerary = serde_json::json!({
            "days": [{
                "day": 1,
                "activities": [{"time": "19:00", "location": "Sunrise Bar", "category": "bar"}],
            }]
        });
        let issues = check(&itinerary);
        assert!(issues.is_empty());
    }

    #[test]
    fn suppresses_warning_when_error_already_raised_for_same_spot_day() {
        let itinerary = serde_json::json!({
            "days": [{
                "day": 1,
                "activities": [{"time": "08:00", "location": "Sky Bar", "category": "bar", "best_visit_time": "20:00"}],
            }]
        });
        let issues = check(&itinerary);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, IssueSeverity::Error);
    }

    #[test]
    fn unconstrained_category_passes_through_without_issue() {
        let itinerary = serde_json::json!({
            "days": [{
                "day": 1,
                "activities": [{"time": "10:00", "location": "Generic Park", "category": "park"}],
            }]
        });
        assert!(check(&itinerary).is_empty());
    }
}
