//! Multi-intent assembly: fixed section order header → itinerary template
//! → spots → hotels → food → detailed cost (spec §4.7). A header is omitted
//! in streaming mode, since each streamed chunk carries only its own section.

use serde_json::{Map, Value};

use travel_core::category::slot_for_time;
use travel_protocol::expert::ExpertResult;
use travel_protocol::task::TaskType;

use crate::clean::{clean_food, clean_hotel, clean_spot};

pub struct Section {
    pub key: &'static str,
    pub reply: String,
    pub ui_data: Value,
}

/// Build the itinerary template: each day's activities bucketed into the
/// four selectable slots shown in the UI (morning/noon/afternoon/evening).
pub fn itinerary_template(itinerary: &Value) -> Value {
    let Some(days) = itinerary.get("days").and_then(|d| d.as_array()) else {
        return Value::Null;
    };

    let templated: Vec<Value> = days
        .iter()
        .map(|day_value| {
            let day = day_value.get("day").cloned().unwrap_or(Value::Null);
            let mut morning = Vec::new();
            let mut noon = Vec::new();
            let mut afternoon = Vec::new();
            let mut evening = Vec::new();

            if let Some(activities) = day_value.get("activities").and_then(|a| a.as_array()) {
                for activity in activities {
                    let time = activity.get("time").and_then(|v| v.as_str()).unwrap_or("12:00");
                    use travel_core::category::TimeSlot::*;
                    match slot_for_time(time) {
                        EarlyMorning | Morning => morning.push(activity.clone()),
                        Midday => noon.push(activity.clone()),
                        Afternoon => afternoon.push(activity.clone()),
                        Evening | Night => evening.push(activity.clone()),
                    }
                }
            }

            serde_json::json!({ "day": day, "morning": morning, "noon": noon, "afternoon": afternoon, "evening": evening })
        })
        .collect();

    Value::Array(templated)
}

/// Build the ordered section list for a given set of intent results.
/// `header` is `None` in streaming mode.
pub fn assemble(results: &[(TaskType, &ExpertResult)], header: Option<String>) -> Vec<Section> {
    let mut sections = Vec::new();

    if let Some(header_text) = header {
        sections.push(Section { key: "header", reply: header_text, ui_data: Value::Null });
    }

    if let Some((_, result)) = results.iter().find(|(t, _)| *t == TaskType::CreateItinerary) {
        let itinerary = result.data.first().cloned().unwrap_or(Value::Null);
        let template = itinerary_template(&itinerary);
        let day_count = itinerary.get("days").and_then(|d| d.as_array()).map(|d| d.len()).unwrap_or(0);
        sections.push(Section {
            key: "itinerary",
            reply: format!("Here is your {day_count}-day itinerary."),
            ui_data: serde_json::json!({ "itinerary": itinerary, "template": template }),
        });
    }

    if let Some((_, result)) = results.iter().find(|(t, _)| *t == TaskType::FindSpots) {
        let cleaned: Vec<Value> = result.data.iter().map(clean_spot).collect();
        if !cleaned.is_empty() {
            sections.push(Section {
                key: "spots",
                reply: format!("{} spot suggestions.", cleaned.len()),
                ui_data: serde_json::json!({ "spots": cleaned }),
            });
        }
    }

    if let Some((_, result)) = results.iter().find(|(t, _)| *t == TaskType::FindHotels) {
        let cleaned: Vec<Value> = result.data.iter().map(clean_hotel).collect();
        if !cleaned.is_empty() {
            sections.push(Section {
                key: "hotels",
                reply: format!("{} hotel options.", cleaned.len()),
                ui_data: serde_json::json!({ "hotels": cleaned }),
            });
        }
    }

    if let Some((_, result)) = results.iter().find(|(t, _)| *t == TaskType::FindFood) {
        let cleaned: Vec<Value> = result.data.iter().map(clean_food).collect();
        if !cleaned.is_empty() {
            sections.push(Section {
                key: "food",
                reply: format!("{} food picks.", cleaned.len()),
                ui_data: serde_json::json!({ "food": cleaned }),
            });
        }
    }

    if let Some((_, result)) = results.iter().find(|(t, _)| *t == TaskType::CalculateCost) {
        let cost = result.data.first().cloned().unwrap_or(Value::Null);
        sections.push(Section {
            key: "cost",
            reply: format!("Estimated total cost: {} VND.", cost.get("total").and_then(|v| v.as_i64()).unwrap_or(0)),
            ui_data: serde_json::json!({ "cost": cost }),
        });
    }

    sections
}

pub fn combined_reply(sections: &[Section]) -> String {
    sections.iter().map(|s| s.reply.as_str()).collect::<Vec<_>>().join("\n\n")
}

pub fn combined_ui_data(sections: &[Section]) -> Map<String, Value> {
    let mut combined = Map::new();
    for section in sections {
        if section.key != "header" {
            combined.insert(section.key.to_string(), section.ui_data.clone());
        }
    }
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_assemble_in_fixed_order() {
        let spots = ExpertResult::ok("spot_expert", vec![serde_json::json!({"name": "A"})], "ok");
        let hotels = ExpertResult::ok("hotel_expert", vec![serde_json::json!({"name": "B"})], "ok");
        let results = vec![(TaskType::FindHotels, &hotels), (TaskType::FindSpots, &spots)];
        let sections = assemble(&results, Some("Trip to Da Nang".to_string()));
        let keys: Vec<&str> = sections.iter().map(|s| s.key).collect();
        assert_eq!(keys, vec!["header", "spots", "hotels"]);
    }

    #[test]
    fn streaming_mode_omits_header() {
        let spots = ExpertResult::ok("spot_expert", vec![serde_json::json!({"name": "A"})], "ok");
        let results = vec![(TaskType::FindSpots, &spots)];
        let sections = assemble(&results, None);
        assert!(!sections.iter().any(|s| s.key == "header"));
    }

    #[test]
    fn itinerary_template_buckets_activities_into_four_slots() {
        let itinerary = serde_json::json!({
            "days": [{"day": 1, "activities": [
                {"time": "06:00", "location": "Sunrise"},
                {"time": "12:00", "location": "Lunch"},
                {"time": "15:00", "location": "Museum"},
                {"time": "19:00", "location": "Dinner"},
            ]}]
        });
        let template = itinerary_template(&itinerary);
        assert_eq!(template[0]["morning"].as_array().unwrap().len(), 1);
        assert_eq!(template[0]["noon"].as_array().unwrap().len(), 1);
        assert_eq!(template[0]["afternoon"].as_array().unwrap().len(), 1);
        assert_eq!(template[0]["evening"].as_array().unwrap().len(), 1);
    }
}
