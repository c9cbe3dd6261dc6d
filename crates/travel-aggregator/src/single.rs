//! Single-intent formatters: a short prose reply plus a UI card payload
//! (spec §4.7).

use serde_json::{Map, Value};

use travel_core::context::FinalizedItinerary;
use travel_protocol::expert::ExpertResult;
use travel_protocol::chunk::UiType;

use crate::clean::{clean_food, clean_hotel, clean_spot};
use crate::multi::itinerary_template;

pub struct Formatted {
    pub reply: String,
    pub ui_type: UiType,
    pub ui_data: Map<String, Value>,
}

pub fn format_spots(result: &ExpertResult) -> Formatted {
    let cleaned: Vec<Value> = result.data.iter().map(clean_spot).collect();
    let reply = if cleaned.is_empty() {
        "I couldn't find any matching spots.".to_string()
    } else {
        format!("Here are {} spots you might like.", cleaned.len())
    };
    let mut ui_data = Map::new();
    ui_data.insert("spots".to_string(), Value::Array(cleaned));
    Formatted { reply, ui_type: UiType::SpotCards, ui_data }
}

pub fn format_hotels(result: &ExpertResult) -> Formatted {
    let cleaned: Vec<Value> = result.data.iter().map(clean_hotel).collect();
    let reply = if cleaned.is_empty() {
        "I couldn't find any matching hotels.".to_string()
    } else {
        format!("Here are {} hotel options.", cleaned.len())
    };
    let mut ui_data = Map::new();
    ui_data.insert("hotels".to_string(), Value::Array(cleaned));
    ui_data.insert(
        "actions".to_string(),
        serde_json::json!([
            {"label": "View details", "action": "view_hotel"},
            {"label": "Book now", "action": "book_hotel"},
        ]),
    );
    Formatted { reply, ui_type: UiType::HotelCards, ui_data }
}

pub fn format_food(result: &ExpertResult) -> Formatted {
    let cleaned: Vec<Value> = result.data.iter().map(clean_food).collect();
    let reply = if cleaned.is_empty() {
        "I couldn't find matching food recommendations.".to_string()
    } else {
        format!("Here are {} food picks.", cleaned.len())
    };
    let mut ui_data = Map::new();
    ui_data.insert("food".to_string(), Value::Array(cleaned));
    Formatted { reply, ui_type: UiType::FoodCards, ui_data }
}

pub fn format_itinerary(result: &ExpertResult) -> Formatted {
    let itinerary = result.data.first().cloned().unwrap_or(Value::Null);
    let day_count = itinerary.get("days").and_then(|d| d.as_array()).map(|d| d.len()).unwrap_or(0);
    let reply = format!("Here is your {day_count}-day itinerary.");
    let mut ui_data = Map::new();
    ui_data.insert("itinerary".to_string(), itinerary);
    Formatted { reply, ui_type: UiType::Itinerary, ui_data }
}

/// Formats a persisted/finalized itinerary the same way as a fresh
/// itinerary-expert result, plus the day-bucket template used by the UI.
pub fn format_finalized_itinerary(itinerary: &FinalizedItinerary) -> Formatted {
    let days: Vec<Value> = itinerary
        .days
        .iter()
        .map(|d| {
            let activities: Vec<Value> = d
                .spots
                .iter()
                .map(|s| serde_json::json!({"time": s.time, "location": s.spot.name, "category": s.spot.category}))
                .collect();
            serde_json::json!({"day": d.day, "activities": activities})
        })
        .collect();
    let value = serde_json::json!({"days": days});
    let mut formatted = format_itinerary(&ExpertResult::ok("itinerary_expert", vec![value], "stored itinerary"));
    let template = itinerary_template(&formatted.ui_data["itinerary"]);
    formatted.ui_data.insert("template".to_string(), template);
    formatted.ui_type = UiType::ItineraryDisplay;
    formatted
}

pub fn format_cost(result: &ExpertResult) -> Formatted {
    let cost = result.data.first().cloned().unwrap_or(Value::Null);
    let total = cost.get("total").and_then(|v| v.as_i64()).unwrap_or(0);
    let reply = format!("Estimated total cost: {total} VND.");
    let mut ui_data = Map::new();
    ui_data.insert("cost".to_string(), cost);
    Formatted { reply, ui_type: UiType::Cost, ui_data }
}

pub fn format_general_info(result: &ExpertResult) -> Formatted {
    let record = result.data.first().cloned().unwrap_or(Value::Null);
    let reply = record.get("answer").and_then(|v| v.as_str()).unwrap_or("I don't have that information yet.").to_string();
    let mut ui_data = Map::new();
    ui_data.insert("answer".to_string(), record.get("answer").cloned().unwrap_or(Value::Null));
    ui_data.insert("sources".to_string(), record.get("sources").cloned().unwrap_or(Value::Array(Vec::new())));
    Formatted { reply, ui_type: UiType::Tips, ui_data }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_spot_result_gets_apologetic_reply() {
        let result = ExpertResult::ok("spot_expert", vec![], "none");
        let formatted = format_spots(&result);
        assert!(formatted.reply.contains("couldn't find"));
    }

    #[test]
    fn itinerary_reply_names_day_count() {
        let result = ExpertResult::ok("itinerary_expert", vec![serde_json::json!({"days": [{}, {}]})], "ok");
        let formatted = format_itinerary(&result);
        assert!(formatted.reply.contains('2'));
    }
}
