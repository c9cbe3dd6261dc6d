//! Itinerary Expert (spec §4.4.4).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use travel_core::collaborators::{LlmClient, WeatherService};
use travel_protocol::expert::ExpertResult;
use travel_protocol::task::TaskType;

use crate::expert::{param_array, param_str, param_u64, Expert};
use crate::json_extract::extract_json;

const SCHEMA_SYSTEM_PROMPT: &str = "You are a Vietnamese travel itinerary planner. Respond with a JSON object: {\"days\": [{\"day\": int, \"title\": string, \"activities\": [{\"time\": string, \"activity\": string, \"location\": string, \"type\": string}], \"meals\": [string], \"hotel\": string}]}. Every location must be inside the destination. Never repeat the same spot across days. Give each day a mix of activity categories.";

pub struct ItineraryExpert {
    llm: Option<Arc<dyn LlmClient>>,
    weather: Option<Arc<dyn WeatherService>>,
}

impl ItineraryExpert {
    pub fn new(llm: Option<Arc<dyn LlmClient>>, weather: Option<Arc<dyn WeatherService>>) -> Self {
        Self { llm, weather }
    }
}

#[async_trait]
impl Expert for ItineraryExpert {
    fn task_type(&self) -> TaskType {
        TaskType::CreateItinerary
    }

    async fn execute(&self, query: &str, parameters: &Map<String, Value>) -> ExpertResult {
        let duration = param_u64(parameters, "duration").unwrap_or(3).max(1) as u32;
        let location = param_str(parameters, "location").unwrap_or("the destination").to_string();
        let people_count = param_u64(parameters, "people_count").unwrap_or(1);
        let spots: Vec<Value> = param_array(parameters, "spots_data").into_iter().cloned().collect();
        let food: Vec<Value> = param_array(parameters, "food_data").into_iter().cloned().collect();
        let hotels: Vec<Value> = param_array(parameters, "hotel_data").into_iter().cloned().collect();

        if let Some(llm) = &self.llm {
            let mut prompt = format!(
                "Destination: {location}\nDuration: {duration} days\nPeople: {people_count}\nRequest: {query}\nAvailable spots: {spots}\nAvailable food: {food}",
                spots = serde_json::to_string(&spots).unwrap_or_default(),
                food = serde_json::to_string(&food).unwrap_or_default(),
            );
            if let Some(weather_service) = &self.weather {
                if let Ok(forecast) = weather_service.get_weather(&travel_core::geo::normalize_location(&location), "", duration).await {
                    prompt.push_str(&format!("\nWeather comfort level: {}", forecast.overall_comfort_level));
                }
            }

            match llm.extract_json(&prompt, Some(SCHEMA_SYSTEM_PROMPT)).await {
                Ok(value) => return ExpertResult::ok("itinerary_expert", vec![value], "itinerary generated by llm"),
                Err(_) => {
                    if let Ok(raw) = llm.chat(&[("user".to_string(), prompt)], Some(0.4), Some(1500)).await {
                        if let Some(value) = extract_json(&raw) {
                            return ExpertResult::ok("itinerary_expert", vec![value], "itinerary parsed from llm text");
                        }
                    }
                }
            }
        }

        let synthesized = synthesize_itinerary(duration, &spots, &food, &hotels);
        ExpertResult::ok("itinerary_expert", vec![synthesized], "itinerary synthesized from search results")
    }
}

/// Index-based fallback: spots divided evenly across days (at least one per
/// day when available); each day gets morning spot, noon meal (round-robin
/// by day index), optional second spot, evening meal/rest.
fn synthesize_itinerary(duration: u32, spots: &[Value], food: &[Value], hotels: &[Value]) -> Value {
    let mut days = Vec::new();
    let spots_per_day = if spots.is_empty() { 0 } else { (spots.len() / duration as usize).max(1) };

    for day in 1..=duration {
        let start = (day as usize - 1) * spots_per_day;
        let day_spots: Vec<&Value> = spots.iter().skip(start).take(spots_per_day.max(1)).collect();

        let mut activities = Vec::new();
        if let Some(morning) = day_spots.first() {
            activities.push(activity("08:00", morning, "spot"));
        }
        if !food.is_empty() {
            let meal = &food[(day as usize - 1) % food.len()];
            activities.push(activity("12:00", meal, "meal"));
        }
        if let Some(afternoon) = day_spots.get(1) {
            activities.push(activity("15:00", afternoon, "spot"));
        }
        if !food.is_empty() {
            let meal = &food[day as usize % food.len()];
            activities.push(activity("19:00", meal, "meal"));
        }

        days.push(serde_json::json!({
            "day": day,
            "title": format!("Day {day}"),
            "activities": activities,
            "meals": [],
            "hotel": hotels.first().and_then(|h| h.get("name")).cloned().unwrap_or(Value::Null),
        }));
    }

    serde_json::json!({ "days": days })
}

fn activity(time: &str, record: &Value, kind: &str) -> Value {
    let category = record.get("category").cloned().unwrap_or_else(|| Value::String(kind.to_string()));
    serde_json::json!({
        "time": time,
        "activity": record.get("name").cloned().unwrap_or(Value::String("Activity".to_string())),
        "location": record.get("name").cloned().unwrap_or(Value::Null),
        "type": kind,
        "category": category,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn synthesizes_without_llm() {
        let expert = ItineraryExpert::new(None, None);
        let mut params = Map::new();
        params.insert("location".to_string(), serde_json::json!("lao-cai"));
        params.insert("duration".to_string(), serde_json::json!(2));
        params.insert(
            "spots_data".to_string(),
            serde_json::json!([{"name": "Fansipan"}, {"name": "Cat Cat Village"}]),
        );
        params.insert("food_data".to_string(), serde_json::json!([{"name": "Thang Co"}]));
        let result = expert.execute("itinerary", &params).await;
        assert!(result.success);
        let days = result.data[0]["days"].as_array().unwrap();
        assert_eq!(days.len(), 2);
    }

    #[tokio::test]
    async fn defaults_duration_to_three_when_zero() {
        let expert = ItineraryExpert::new(None, None);
        let mut params = Map::new();
        params.insert("location".to_string(), serde_json::json!("hue"));
        let result = expert.execute("itinerary", &params).await;
        let days = result.data[0]["days"].as_array().unwrap();
        assert_eq!(days.len(), 3);
    }
}
