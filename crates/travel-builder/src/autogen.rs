//! Auto-generate mode (spec §4.6): an LLM-proposed full plan with names
//! fuzzy-mapped onto real candidates, followed by hotel auto-selection.

use travel_core::collaborators::LlmClient;
use travel_core::context::RecentRecord;
use travel_memory::ordinal::similarity;

const SIMILARITY_THRESHOLD: f64 = 0.6;

const FOOD_PER_DAY: i64 = 500_000;
const TRANSPORT_PER_DAY: i64 = 300_000;
const ACTIVITIES_PER_DAY: i64 = 300_000;

const SCHEMA_SYSTEM_PROMPT: &str = "Propose a full day-by-day plan. Respond with JSON: {\"days\": [{\"day\": int, \"spots\": [{\"name\": string, \"session\": string}]}], \"total_estimated_cost\": int, \"reasoning\": string}.";

#[derive(Debug, Clone)]
pub struct AutoGenDay {
    pub day: u32,
    pub spots: Vec<RecentRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct AutoGeneratePlan {
    pub days: Vec<AutoGenDay>,
    pub selected_hotel: Option<RecentRecord>,
    pub budget_warning: Option<String>,
}

pub async fn generate(
    llm: &dyn LlmClient,
    location: &str,
    duration: u32,
    budget: Option<i64>,
    candidates: &[RecentRecord],
    hotels: &[RecentRecord],
) -> Option<AutoGeneratePlan> {
    let prompt = format!("Destination: {location}\nDuration: {duration} days\nCandidate spots: {}",
        serde_json::to_string(&candidates.iter().map(|c| &c.name).collect::<Vec<_>>()).unwrap_or_default());

    let value = llm.extract_json(&prompt, Some(SCHEMA_SYSTEM_PROMPT)).await.ok()?;
    let raw_days = value.get("days")?.as_array()?;

    let days: Vec<AutoGenDay> = raw_days
        .iter()
        .filter_map(|d| {
            let day = d.get("day")?.as_u64()? as u32;
            let spots = d.get("spots")?.as_array()?;
            let mapped = spots
                .iter()
                .filter_map(|s| s.get("name").and_then(|n| n.as_str()))
                .map(|name| map_spot_name(name, candidates))
                .collect();
            Some(AutoGenDay { day, spots: mapped })
        })
        .collect();

    let selected_hotel = select_hotel(budget, duration, hotels);
    let budget_warning = selected_hotel.as_ref().and_then(|h| {
        budget.and_then(|b| {
            let cap = per_night_cap(b, duration);
            h.price.filter(|p| *p as f64 > cap).map(|_| "selected hotel exceeds the estimated per-night budget".to_string())
        })
    });

    Some(AutoGeneratePlan { days, selected_hotel, budget_warning })
}

/// Fuzzy-map a proposed spot name onto a real candidate (similarity ≥ 0.6);
/// unmapped names are kept as coordinate-less placeholders.
fn map_spot_name(name: &str, candidates: &[RecentRecord]) -> RecentRecord {
    candidates
        .iter()
        .map(|c| (similarity(name, &c.name), c))
        .filter(|(score, _)| *score >= SIMILARITY_THRESHOLD)
        .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(_, c)| c.clone())
        .unwrap_or_else(|| RecentRecord {
            id: format!("placeholder-{}", name.to_lowercase().replace(' ', "-")),
            name: name.to_string(),
            category: None,
            rating: None,
            price: None,
            lat: None,
            lng: None,
            image: None,
            best_visit_time: Vec::new(),
            avg_duration_min: None,
        })
}

fn per_night_cap(budget: i64, duration: u32) -> f64 {
    let nights = duration.max(1) as f64;
    let raw_other = ((FOOD_PER_DAY + TRANSPORT_PER_DAY + ACTIVITIES_PER_DAY) * duration.max(1) as i64) as f64;
    let cap_for_other = budget as f64 * 0.7;
    let scaled_other = raw_other.min(cap_for_other);
    ((budget as f64 - scaled_other) / nights).max(0.0)
}

fn select_hotel(budget: Option<i64>, duration: u32, hotels: &[RecentRecord]) -> Option<RecentRecord> {
    if hotels.is_empty() {
        return None;
    }
    let Some(budget) = budget else {
        return hotels.iter().min_by_key(|h| h.price.unwrap_or(i64::MAX)).cloned();
    };

    let cap = per_night_cap(budget, duration);
    hotels
        .iter()
        .filter(|h| h.price.map(|p| p as f64 <= cap).unwrap_or(false))
        .min_by_key(|h| h.price.unwrap_or(i64::MAX))
        .or_else(|| hotels.iter().min_by_key(|h| h.price.unwrap_or(i64::MAX)))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotel(id: &str, price: i64) -> RecentRecord {
        RecentRecord { id: id.into(), name: format!("Hotel {id}"), category: None, rating: None, price: Some(price), lat: None, lng: None, image: None, best_visit_time: vec![], avg_duration_min: None }
    }

    #[test]
    fn picks_cheapest_hotel_within_cap() {
        let hotels = vec![hotel("a", 2_000_000), hotel("b", 800_000)];
        let selected = select_hotel(Some(6_000_000), 2, &hotels).unwrap();
        assert_eq!(selected.id, "b");
    }

    #[test]
    fn falls_back_to_cheapest_when_none_fit_cap() {
        let hotels = vec![hotel("a", 50_000_000)];
        let selected = select_hotel(Some(1_000_000), 1, &hotels).unwrap();
        assert_eq!(selected.id, "a");
    }

    #[test]
    fn other_costs_scaled_down_past_seventy_percent_threshold() {
        let cap = per_night_cap(500_000, 3);
        assert!(cap >= 0.0);
    }

    #[test]
    fn unmapped_name_becomes_placeholder_without_coordinates() {
        let candidates = vec![RecentRecord { id: "1".into(), name: "Fansipan".into(), category: None, rating: None, price: None, lat: Some(1.0), lng: Some(1.0), image: None, best_visit_time: vec![], avg_duration_min: None }];
        let mapped = map_spot_name("Totally Unknown Place", &candidates);
        assert!(mapped.lat.is_none());
    }
}
