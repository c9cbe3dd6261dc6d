//! Expert Dispatcher (spec §4.4): a fixed registry keyed by task_type.
//! Injects prior-stage results into parameters under canonical keys before
//! calling execute, records execution_time_ms, and never lets an expert's
//! failure escape — a failed call simply produces a `success=false`
//! envelope, mirroring the teacher's panic-is-caught-at-one-boundary design.

use std::collections::HashMap;
use std::time::Instant;

use travel_protocol::expert::ExpertResult;
use travel_protocol::task::{SubTask, TaskType};

use crate::expert::Expert;

/// Canonical parameter keys a dependent task's prior results are injected
/// under (spec §4.4).
pub const SPOTS_DATA_KEY: &str = "spots_data";
pub const FOOD_DATA_KEY: &str = "food_data";
pub const HOTEL_DATA_KEY: &str = "hotel_data";
pub const ITINERARY_DATA_KEY: &str = "itinerary_data";

fn injection_key(task_type: TaskType) -> &'static str {
    match task_type {
        TaskType::FindSpots => SPOTS_DATA_KEY,
        TaskType::FindFood => FOOD_DATA_KEY,
        TaskType::FindHotels => HOTEL_DATA_KEY,
        TaskType::CreateItinerary => ITINERARY_DATA_KEY,
        TaskType::CalculateCost | TaskType::GeneralInfo => "",
    }
}

pub struct ExpertDispatcher {
    registry: HashMap<TaskType, Box<dyn Expert>>,
}

impl ExpertDispatcher {
    pub fn new() -> Self {
        Self { registry: HashMap::new() }
    }

    pub fn register(&mut self, expert: Box<dyn Expert>) {
        self.registry.insert(expert.task_type(), expert);
    }

    /// Run one sub-task, injecting the results of its dependencies (already
    /// executed this turn) under the canonical keys before calling execute.
    pub async fn dispatch(&self, task: &SubTask, prior: &HashMap<travel_core::types::TaskId, ExpertResult>) -> ExpertResult {
        let start = Instant::now();

        let Some(expert) = self.registry.get(&task.task_type) else {
            return ExpertResult::failed(
                format!("{:?}", task.task_type),
                format!("no expert registered for {:?}", task.task_type),
            );
        };

        let mut parameters = task.parameters.clone();
        for dep_id in &task.depends_on {
            if let Some(dep_result) = prior.get(dep_id) {
                let key = injection_key(dep_result_task_type(dep_id, task));
                if !key.is_empty() {
                    parameters.insert(key.to_string(), serde_json::Value::Array(dep_result.data.clone()));
                }
            }
        }

        let mut result = expert.execute(&task.reformulated_query, &parameters).await;
        result.execution_time_ms = start.elapsed().as_millis() as u64;
        result
    }
}

/// Best-effort task-type lookup for a dependency id by its canonical
/// prefix — the planner always mints ids as `"{prefix}_{n}"`.
fn dep_result_task_type(dep_id: &travel_core::types::TaskId, _task: &SubTask) -> TaskType {
    let prefix = dep_id.as_str().rsplit_once('_').map(|(p, _)| p).unwrap_or(dep_id.as_str());
    match prefix {
        "spots" => TaskType::FindSpots,
        "hotel" => TaskType::FindHotels,
        "food" => TaskType::FindFood,
        "itinerary" => TaskType::CreateItinerary,
        "cost" => TaskType::CalculateCost,
        _ => TaskType::GeneralInfo,
    }
}

impl Default for ExpertDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use travel_core::types::TaskId;

    struct StubExpert(TaskType);

    #[async_trait]
    impl Expert for StubExpert {
        fn task_type(&self) -> TaskType {
            self.0
        }

        async fn execute(&self, _query: &str, parameters: &serde_json::Map<String, serde_json::Value>) -> ExpertResult {
            ExpertResult::ok("stub", vec![serde_json::json!({"saw_spots": parameters.contains_key(SPOTS_DATA_KEY)})], "ok")
        }
    }

    #[tokio::test]
    async fn missing_expert_yields_failure_envelope() {
        let dispatcher = ExpertDispatcher::new();
        let task = SubTask {
            task_id: TaskId::from("food_1"),
            task_type: TaskType::FindFood,
            reformulated_query: "food".to_string(),
            parameters: serde_json::Map::new(),
            depends_on: Default::default(),
            priority: 1,
            optional: false,
        };
        let result = dispatcher.dispatch(&task, &HashMap::new()).await;
        assert!(!result.success);
    }

    #[tokio::test]
    async fn injects_dependency_data_under_canonical_key() {
        let mut dispatcher = ExpertDispatcher::new();
        dispatcher.register(Box::new(StubExpert(TaskType::CreateItinerary)));

        let spots_result = ExpertResult::ok("spot_expert", vec![serde_json::json!({"id": "1"})], "ok");
        let mut prior = HashMap::new();
        prior.insert(TaskId::from("spots_1"), spots_result);

        let task = SubTask {
            task_id: TaskId::from("itinerary_1"),
            task_type: TaskType::CreateItinerary,
            reformulated_query: "itinerary".to_string(),
            parameters: serde_json::Map::new(),
            depends_on: [TaskId::from("spots_1")].into_iter().collect(),
            priority: 2,
            optional: false,
        };

        let result = dispatcher.dispatch(&task, &prior).await;
        assert!(result.data[0]["saw_spots"].as_bool().unwrap());
    }
}
