//! Pure function Intent Record → Execution Plan (spec §4.3, C4).

use std::collections::HashSet;

use serde_json::{json, Map};
use travel_core::types::TaskId;
use travel_protocol::intent::{Accommodation, Intent, IntentRecord};
use travel_protocol::task::{ExecutionPlan, SubTask, TaskType};

use crate::dag::topological_order;
use crate::error::Result;

fn params(pairs: &[(&str, serde_json::Value)]) -> Map<String, serde_json::Value> {
    pairs.iter().cloned().map(|(k, v)| (k.to_string(), v)).collect()
}

fn base_params(record: &IntentRecord) -> Map<String, serde_json::Value> {
    params(&[
        ("location", json!(record.location)),
        ("duration", json!(record.duration)),
        ("people_count", json!(record.people_count)),
        ("interests", json!(record.interests)),
        ("keywords", json!(record.keywords)),
    ])
}

/// Build an Execution Plan for one Intent Record. For `plan_trip`, emits the
/// fixed skeleton: spots/food/hotels in parallel at priority 1 (hotels
/// omitted when `accommodation == none`), itinerary at 2, cost at 3 (only
/// when a budget is present).
pub fn build_plan(record: &IntentRecord) -> Result<ExecutionPlan> {
    let tasks = match record.primary_intent {
        Intent::PlanTrip => plan_trip_tasks(record),
        Intent::FindHotel => vec![single_task(record, TaskType::FindHotels, 1)],
        Intent::FindFood => vec![single_task(record, TaskType::FindFood, 1)],
        Intent::FindSpot => vec![single_task(record, TaskType::FindSpots, 1)],
        _ => vec![single_task(record, TaskType::GeneralInfo, 1)],
    };

    let execution_order = topological_order(&tasks)?;

    Ok(ExecutionPlan {
        tasks,
        execution_order,
        intent: format!("{:?}", record.primary_intent).to_lowercase(),
        location: record.location.clone(),
    })
}

fn single_task(record: &IntentRecord, task_type: TaskType, priority: u32) -> SubTask {
    SubTask {
        task_id: TaskId::new(task_type.id_prefix(), 1),
        task_type,
        reformulated_query: reformulate(record, task_type),
        parameters: base_params(record),
        depends_on: HashSet::new(),
        priority,
        optional: false,
    }
}

fn plan_trip_tasks(record: &IntentRecord) -> Vec<SubTask> {
    let mut tasks = Vec::new();

    let spots = single_task(record, TaskType::FindSpots, 1);
    let food = single_task(record, TaskType::FindFood, 1);
    let spots_id = spots.task_id.clone();
    let food_id = food.task_id.clone();
    tasks.push(spots);
    tasks.push(food);

    let hotels_id = if record.accommodation != Accommodation::None {
        let hotels = single_task(record, TaskType::FindHotels, 1);
        let id = hotels.task_id.clone();
        tasks.push(hotels);
        Some(id)
    } else {
        None
    };

    let mut itinerary_deps: HashSet<TaskId> = [spots_id, food_id].into_iter().collect();
    if let Some(id) = &hotels_id {
        itinerary_deps.insert(id.clone());
    }

    let itinerary = SubTask {
        task_id: TaskId::new(TaskType::CreateItinerary.id_prefix(), 1),
        task_type: TaskType::CreateItinerary,
        reformulated_query: reformulate(record, TaskType::CreateItinerary),
        parameters: base_params(record),
        depends_on: itinerary_deps,
        priority: 2,
        optional: false,
    };
    let itinerary_id = itinerary.task_id.clone();
    tasks.push(itinerary);

    if record.budget.is_some() || record.budget_level.is_some() {
        let cost = SubTask {
            task_id: TaskId::new(TaskType::CalculateCost.id_prefix(), 1),
            task_type: TaskType::CalculateCost,
            reformulated_query: reformulate(record, TaskType::CalculateCost),
            parameters: base_params(record),
            depends_on: [itinerary_id].into_iter().collect(),
            priority: 3,
            optional: false,
        };
        tasks.push(cost);
    }

    tasks
}

fn reformulate(record: &IntentRecord, task_type: TaskType) -> String {
    let location = record.location.as_deref().unwrap_or("the destination");
    match task_type {
        TaskType::FindSpots => format!("tourist spots in {location}"),
        TaskType::FindHotels => format!("hotels in {location}"),
        TaskType::FindFood => format!("food and restaurants in {location}"),
        TaskType::CreateItinerary => format!("itinerary for {location}"),
        TaskType::CalculateCost => format!("trip cost estimate for {location}"),
        TaskType::GeneralInfo => format!("general information about {location}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use travel_core::types::PriceRange;

    fn record(intent: Intent) -> IntentRecord {
        let mut r = IntentRecord::fallback(intent, 0.9);
        r.location = Some("lao-cai".to_string());
        r.duration = Some(3);
        r
    }

    #[test]
    fn plan_trip_emits_full_skeleton_without_cost() {
        let r = record(Intent::PlanTrip);
        let plan = build_plan(&r).unwrap();
        let types: Vec<TaskType> = plan.tasks.iter().map(|t| t.task_type).collect();
        assert!(types.contains(&TaskType::FindSpots));
        assert!(types.contains(&TaskType::FindHotels));
        assert!(types.contains(&TaskType::FindFood));
        assert!(types.contains(&TaskType::CreateItinerary));
        assert!(!types.contains(&TaskType::CalculateCost));
    }

    #[test]
    fn plan_trip_with_budget_adds_cost_task() {
        let mut r = record(Intent::PlanTrip);
        r.budget = Some(PriceRange::new(None, Some(5_000_000)));
        let plan = build_plan(&r).unwrap();
        assert!(plan.tasks.iter().any(|t| t.task_type == TaskType::CalculateCost));
        let cost = plan.tasks.iter().find(|t| t.task_type == TaskType::CalculateCost).unwrap();
        assert_eq!(cost.priority, 3);
    }

    #[test]
    fn plan_trip_omits_hotels_when_accommodation_none() {
        let mut r = record(Intent::PlanTrip);
        r.accommodation = Accommodation::None;
        let plan = build_plan(&r).unwrap();
        assert!(!plan.tasks.iter().any(|t| t.task_type == TaskType::FindHotels));
    }

    #[test]
    fn single_intent_yields_one_task() {
        let r = record(Intent::FindHotel);
        let plan = build_plan(&r).unwrap();
        assert_eq!(plan.tasks.len(), 1);
        assert_eq!(plan.tasks[0].task_type, TaskType::FindHotels);
    }

    #[test]
    fn parallel_tasks_groups_by_priority() {
        let mut r = record(Intent::PlanTrip);
        r.budget = Some(PriceRange::new(None, Some(5_000_000)));
        let plan = build_plan(&r).unwrap();
        let groups = plan.parallel_tasks();
        assert_eq!(groups[0].0, 1);
        assert_eq!(groups[0].1.len(), 3);
        assert_eq!(groups.last().unwrap().0, 3);
    }
}
