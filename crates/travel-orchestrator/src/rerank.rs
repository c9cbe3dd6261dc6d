//! Intent re-ranking (spec §4.1): when a non-primary stage's results are
//! clearly better than the primary intent's own stage, the orchestrator
//! reports that stage's intent instead. Applies only when more than one
//! stage produced results — a single-stage plan has nothing to re-rank
//! against.

use std::collections::HashMap;

use travel_core::config::RerankConfig;
use travel_protocol::expert::ExpertResult;
use travel_protocol::intent::Intent;
use travel_protocol::task::TaskType;

pub fn task_type_for_intent(intent: Intent) -> Option<TaskType> {
    Some(match intent {
        Intent::FindSpot | Intent::MoreSpots => TaskType::FindSpots,
        Intent::FindHotel | Intent::MoreHotels => TaskType::FindHotels,
        Intent::FindFood | Intent::MoreFood => TaskType::FindFood,
        Intent::PlanTrip | Intent::ShowItinerary => TaskType::CreateItinerary,
        Intent::CalculateCost => TaskType::CalculateCost,
        Intent::GeneralQa | Intent::GetDetail => TaskType::GeneralInfo,
        _ => return None,
    })
}

fn intent_for_task_type(task_type: TaskType) -> Intent {
    match task_type {
        TaskType::FindSpots => Intent::FindSpot,
        TaskType::FindHotels => Intent::FindHotel,
        TaskType::FindFood => Intent::FindFood,
        TaskType::CreateItinerary => Intent::PlanTrip,
        TaskType::CalculateCost => Intent::CalculateCost,
        TaskType::GeneralInfo => Intent::GeneralQa,
    }
}

/// Returns the intent that should be reported as primary after weighing
/// every stage's result quality against the originally detected primary.
pub fn select(results: &HashMap<TaskType, ExpertResult>, primary: Intent, config: &RerankConfig) -> Intent {
    let Some(primary_task_type) = task_type_for_intent(primary) else {
        return primary;
    };

    let primary_quality = results.get(&primary_task_type).map(|r| r.quality_score(primary_task_type)).unwrap_or(0.0);

    let best_non_primary = results
        .iter()
        .filter(|(tt, _)| **tt != primary_task_type)
        .map(|(tt, r)| (*tt, r.quality_score(*tt)))
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap());

    let Some((candidate_task_type, candidate_quality)) = best_non_primary else {
        return primary;
    };

    let gap = candidate_quality - primary_quality;
    let promote = candidate_quality > config.non_primary_min
        && (primary_quality < config.primary_max || gap > config.gap);

    if promote {
        intent_for_task_type(candidate_task_type)
    } else {
        primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(data_len: usize) -> ExpertResult {
        ExpertResult::ok("x", (0..data_len).map(|i| serde_json::json!({"id": i})).collect(), "ok")
    }

    #[test]
    fn promotes_when_primary_is_weak_and_other_is_strong() {
        let mut results = HashMap::new();
        results.insert(TaskType::FindHotels, result(0));
        results.insert(TaskType::FindSpots, result(10));
        let config = RerankConfig::default();
        let chosen = select(&results, Intent::FindHotel, &config);
        assert_eq!(chosen, Intent::FindSpot);
    }

    #[test]
    fn keeps_primary_when_both_are_comparable() {
        let mut results = HashMap::new();
        results.insert(TaskType::FindHotels, result(8));
        results.insert(TaskType::FindSpots, result(10));
        let config = RerankConfig::default();
        let chosen = select(&results, Intent::FindHotel, &config);
        assert_eq!(chosen, Intent::FindHotel);
    }

    #[test]
    fn keeps_primary_with_only_one_stage() {
        let mut results = HashMap::new();
        results.insert(TaskType::FindHotels, result(0));
        let config = RerankConfig::default();
        let chosen = select(&results, Intent::FindHotel, &config);
        assert_eq!(chosen, Intent::FindHotel);
    }
}
