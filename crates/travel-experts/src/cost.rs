//! Cost Calculator Expert (spec §4.4.5).

use async_trait::async_trait;
use serde_json::{Map, Value};

use travel_core::types::BudgetLevel;
use travel_protocol::expert::ExpertResult;
use travel_protocol::task::TaskType;

use crate::expert::{param_array, param_str, param_u64, Expert};

struct CostTable {
    accommodation_per_night: i64,
    food_per_person_day: i64,
    transport_per_day: i64,
    activities_per_person_day: i64,
}

fn table_for(level: BudgetLevel) -> CostTable {
    match level {
        BudgetLevel::Thrifty => CostTable {
            accommodation_per_night: 300_000,
            food_per_person_day: 200_000,
            transport_per_day: 100_000,
            activities_per_person_day: 100_000,
        },
        BudgetLevel::Mid => CostTable {
            accommodation_per_night: 800_000,
            food_per_person_day: 500_000,
            transport_per_day: 300_000,
            activities_per_person_day: 300_000,
        },
        BudgetLevel::Luxury => CostTable {
            accommodation_per_night: 2_500_000,
            food_per_person_day: 1_000_000,
            transport_per_day: 800_000,
            activities_per_person_day: 500_000,
        },
    }
}

pub struct CostCalculatorExpert;

#[async_trait]
impl Expert for CostCalculatorExpert {
    fn task_type(&self) -> TaskType {
        TaskType::CalculateCost
    }

    async fn execute(&self, _query: &str, parameters: &Map<String, Value>) -> ExpertResult {
        let duration = param_u64(parameters, "duration").unwrap_or(3).max(1) as i64;
        let people_count = param_u64(parameters, "people_count").unwrap_or(1).max(1) as i64;
        let level = param_str(parameters, "budget_level")
            .and_then(|s| s.parse::<BudgetLevel>().ok())
            .unwrap_or_default();
        let table = table_for(level);

        let hotel_price = param_array(parameters, "hotel_data")
            .first()
            .and_then(|h| h.get("price"))
            .and_then(|v| v.as_i64());

        let accommodation = if duration > 1 {
            hotel_price.unwrap_or(table.accommodation_per_night) * (duration - 1)
        } else {
            0
        };

        let food = table.food_per_person_day * people_count * duration;
        let transport = table.transport_per_day * duration;
        let activities = table.activities_per_person_day * people_count * duration;
        let total = accommodation + food + transport + activities;
        let per_person = total / people_count;

        let breakdown = serde_json::json!({
            "accommodation": accommodation,
            "food": food,
            "transport": transport,
            "activities": activities,
        });

        let record = serde_json::json!({
            "accommodation": accommodation,
            "food": food,
            "transport": transport,
            "activities": activities,
            "total": total,
            "per_person": per_person,
            "breakdown": breakdown,
        });

        ExpertResult::ok("cost_calculator", vec![record], "cost estimated")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn accommodation_is_zero_for_single_day_trips() {
        let expert = CostCalculatorExpert;
        let mut params = Map::new();
        params.insert("duration".to_string(), serde_json::json!(1));
        params.insert("people_count".to_string(), serde_json::json!(2));
        let result = expert.execute("cost", &params).await;
        assert_eq!(result.data[0]["accommodation"], 0);
    }

    #[tokio::test]
    async fn uses_hotel_price_when_known() {
        let expert = CostCalculatorExpert;
        let mut params = Map::new();
        params.insert("duration".to_string(), serde_json::json!(3));
        params.insert("people_count".to_string(), serde_json::json!(2));
        params.insert("hotel_data".to_string(), serde_json::json!([{"price": 1_200_000}]));
        let result = expert.execute("cost", &params).await;
        assert_eq!(result.data[0]["accommodation"], 2_400_000);
    }

    #[tokio::test]
    async fn falls_back_to_table_default_without_hotel() {
        let expert = CostCalculatorExpert;
        let mut params = Map::new();
        params.insert("duration".to_string(), serde_json::json!(3));
        params.insert("budget_level".to_string(), serde_json::json!("mid"));
        let result = expert.execute("cost", &params).await;
        assert_eq!(result.data[0]["accommodation"], 1_600_000);
    }

    #[tokio::test]
    async fn scales_food_and_activities_by_people_and_duration() {
        let expert = CostCalculatorExpert;
        let mut params = Map::new();
        params.insert("duration".to_string(), serde_json::json!(2));
        params.insert("people_count".to_string(), serde_json::json!(3));
        params.insert("budget_level".to_string(), serde_json::json!("thrifty"));
        let result = expert.execute("cost", &params).await;
        assert_eq!(result.data[0]["food"], 200_000 * 3 * 2);
        assert_eq!(result.data[0]["transport"], 100_000 * 2);
    }
}
