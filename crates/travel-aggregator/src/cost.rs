//! Detailed cost synthesis, used when the experts did not produce a costs
//! record (spec §4.7). Per-level defaults mirror the Cost Calculator
//! Expert's own table (§4.4.5).

use serde_json::Value;
use travel_core::types::BudgetLevel;

struct CostTable {
    accommodation_per_night: i64,
    food_per_person_day: i64,
    transport_per_day: i64,
    activities_per_person_day: i64,
}

fn table_for(level: BudgetLevel) -> CostTable {
    match level {
        BudgetLevel::Thrifty => CostTable { accommodation_per_night: 300_000, food_per_person_day: 200_000, transport_per_day: 100_000, activities_per_person_day: 100_000 },
        BudgetLevel::Mid => CostTable { accommodation_per_night: 800_000, food_per_person_day: 500_000, transport_per_day: 300_000, activities_per_person_day: 300_000 },
        BudgetLevel::Luxury => CostTable { accommodation_per_night: 2_500_000, food_per_person_day: 1_000_000, transport_per_day: 800_000, activities_per_person_day: 500_000 },
    }
}

pub fn synthesize(hotels: &[Value], budget_level: Option<BudgetLevel>, duration: u32, people_count: u32) -> Value {
    let duration = duration.max(1) as i64;
    let people_count = people_count.max(1) as i64;
    let table = table_for(budget_level.unwrap_or_default());

    let top_hotel_prices: Vec<i64> = hotels.iter().filter_map(|h| h.get("price").and_then(|v| v.as_i64())).take(3).collect();
    let accommodation_per_night = if top_hotel_prices.is_empty() {
        table.accommodation_per_night
    } else {
        top_hotel_prices.iter().sum::<i64>() / top_hotel_prices.len() as i64
    };

    let accommodation = if duration > 1 { accommodation_per_night * (duration - 1) } else { 0 };
    let food = table.food_per_person_day * people_count * duration;
    let transport = table.transport_per_day * duration;
    let activities = table.activities_per_person_day * people_count * duration;
    let total = accommodation + food + transport + activities;
    let per_person = total / people_count;

    let daily_estimate = accommodation_per_night + table.food_per_person_day * people_count + table.transport_per_day + table.activities_per_person_day * people_count;

    serde_json::json!({
        "total": total,
        "per_person": per_person,
        "breakdown": {
            "accommodation": accommodation,
            "food": food,
            "transport": transport,
            "activities": activities,
        },
        "daily_estimate": daily_estimate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_top_three_hotel_prices_for_accommodation() {
        let hotels = vec![
            serde_json::json!({"price": 1_000_000}),
            serde_json::json!({"price": 2_000_000}),
            serde_json::json!({"price": 3_000_000}),
            serde_json::json!({"price": 9_000_000}),
        ];
        let cost = synthesize(&hotels, None, 3, 2);
        assert_eq!(cost["breakdown"]["accommodation"], 2_000_000 * 2);
    }

    #[test]
    fn falls_back_to_budget_level_default_without_hotels() {
        let cost = synthesize(&[], Some(BudgetLevel::Luxury), 2, 1);
        assert_eq!(cost["breakdown"]["accommodation"], 2_500_000);
    }
}
