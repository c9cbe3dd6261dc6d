//! Auto-fix: move error-severity activities to an acceptable slot, then
//! redistribute times evenly within each day (spec §4.4.7).

use std::collections::HashSet;

use serde_json::Value;

use travel_protocol::verification::{IssueSeverity, VerificationIssue};

const MORNING_BUCKET: (u32, u32) = (8 * 60, 11 * 60);
const AFTERNOON_BUCKET: (u32, u32) = (12 * 60 + 30, 15 * 60 + 30);
const EVENING_BUCKET: (u32, u32) = (17 * 60, 20 * 60 + 30);

/// Returns the fixed itinerary (leaves the input untouched).
pub fn apply(itinerary: &Value, issues: &[VerificationIssue]) -> Value {
    let mut fixed = itinerary.clone();
    let Some(days) = fixed.get_mut("days").and_then(|d| d.as_array_mut()) else {
        return fixed;
    };

    for day_value in days.iter_mut() {
        let day_number = day_value.get("day").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
        let Some(activities) = day_value.get_mut("activities").and_then(|a| a.as_array_mut()) else {
            continue;
        };

        let moved = move_error_activities(activities, issues, day_number);
        redistribute_times(activities, &moved);
    }

    fixed
}

/// Moves each error-severity activity to its expected slot and stamps its
/// time. Returns the set of locations just stamped so the redistribution
/// pass below leaves them alone instead of re-bucketing them.
fn move_error_activities(activities: &mut Vec<Value>, issues: &[VerificationIssue], day: u32) -> HashSet<String> {
    let mut moved = HashSet::new();
    for issue in issues.iter().filter(|i| i.severity == IssueSeverity::Error && i.day == day) {
        let Some(pos) = activities.iter().position(|a| {
            a.get("location").and_then(|v| v.as_str()) == Some(issue.spot_name.as_str())
        }) else {
            continue;
        };

        let target = issue.expected_slots.first().map(String::as_str).unwrap_or("midday");
        let mut activity = activities.remove(pos);
        stamp_time(&mut activity, target);
        moved.insert(issue.spot_name.clone());

        match target {
            "morning" | "early_morning" => activities.insert(0, activity),
            "evening" | "night" => activities.push(activity),
            _ => activities.insert(pos.min(activities.len()), activity),
        }
    }
    moved
}

fn stamp_time(activity: &mut Value, slot: &str) {
    let time = match slot {
        "early_morning" => "06:00",
        "morning" => "08:00",
        "evening" => "19:00",
        "night" => "21:00",
        "afternoon" => "15:00",
        _ => "12:00",
    };
    if let Some(obj) = activity.as_object_mut() {
        obj.insert("time".to_string(), Value::String(time.to_string()));
    }
}

/// Final pass: classify each activity into the morning/afternoon/evening
/// bucket and spread times evenly within it. Activities just moved and
/// stamped by `move_error_activities` are left untouched — their stamped
/// time is the fix, not a round-robin guess.
fn redistribute_times(activities: &mut [Value], moved: &HashSet<String>) {
    let mut buckets: [Vec<usize>; 3] = [Vec::new(), Vec::new(), Vec::new()];
    let mut round_robin = 0usize;

    for (i, activity) in activities.iter().enumerate() {
        let name = activity.get("location").and_then(|v| v.as_str()).unwrap_or("").to_lowercase();
        if moved.contains(activity.get("location").and_then(|v| v.as_str()).unwrap_or("")) {
            continue;
        }
        let category = activity.get("category").and_then(|v| v.as_str()).unwrap_or("");

        let bucket = if matches!(category, "bar" | "nightlife" | "club" | "night_market") {
            2
        } else if name.contains("sunset") {
            1
        } else if name.contains("sunrise") {
            0
        } else if name.contains("chợ đêm") || name.contains("night market") {
            2
        } else {
            let b = round_robin % 3;
            round_robin += 1;
            b
        };
        buckets[bucket].push(i);
    }

    for (bucket_idx, indices) in buckets.iter().enumerate() {
        let (start, end) = match bucket_idx {
            0 => MORNING_BUCKET,
            1 => AFTERNOON_BUCKET,
            _ => EVENING_BUCKET,
        };
        let n = indices.len();
        for (rank, &i) in indices.iter().enumerate() {
            let minute = if n <= 1 { start } else { start + (rank as u32) * (end - start) / (n as u32 - 1) };
            let time = format!("{:02}:{:02}", minute / 60, minute % 60);
            if let Some(obj) = activities[i].as_object_mut() {
                obj.insert("time".to_string(), Value::String(time));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use travel_protocol::verification::IssueSeverity;

    fn issue(day: u32, spot_name: &str, expected: &str) -> VerificationIssue {
        VerificationIssue {
            issue_type: "time_of_day_mismatch".to_string(),
            spot_id: spot_name.to_string(),
            spot_name: spot_name.to_string(),
            current_slot: "morning".to_string(),
            expected_slots: vec![expected.to_string()],
            day,
            severity: IssueSeverity::Error,
            reason: "test".to_string(),
            suggested_fix: None,
        }
    }

    #[test]
    fn moves_evening_target_to_end_and_stamps_time() {
        let itinerary = serde_json::json!({
            "days": [{
                "day": 1,
                "activities": [
                    {"time": "08:00", "location": "Sky Bar", "category": "bar"},
                    {"time": "10:00", "location": "Museum", "category": "museum"},
                ]
            }]
        });
        let issues = vec![issue(1, "Sky Bar", "evening")];
        let fixed = apply(&itinerary, &issues);
        let activities = fixed["days"][0]["activities"].as_array().unwrap();
        assert_eq!(activities.last().unwrap()["location"], "Sky Bar");
        assert_eq!(activities.last().unwrap()["time"], "19:00");
    }

    #[test]
    fn night_market_fix_survives_redistribution() {
        let itinerary = serde_json::json!({
            "days": [{
                "day": 1,
                "activities": [
                    {"time": "08:00", "location": "Chợ Đêm Sơn Trà", "category": "night_market"},
                    {"time": "10:00", "location": "Museum", "category": "museum"},
                ]
            }]
        });
        let issues = vec![issue(1, "Chợ Đêm Sơn Trà", "evening")];
        let fixed = apply(&itinerary, &issues);
        let activities = fixed["days"][0]["activities"].as_array().unwrap();
        let market = activities.iter().find(|a| a["location"] == "Chợ Đêm Sơn Trà").unwrap();
        assert_eq!(market["time"], "19:00");
    }

    #[test]
    fn redistribution_spreads_bar_into_evening_bucket() {
        let itinerary = serde_json::json!({
            "days": [{
                "day": 1,
                "activities": [{"time": "19:00", "location": "Sky Bar", "category": "bar"}],
            }]
        });
        let fixed = apply(&itinerary, &[]);
        let time = fixed["days"][0]["activities"][0]["time"].as_str().unwrap();
        assert_eq!(time, "17:00");
    }
}
