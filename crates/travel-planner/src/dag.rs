//! Kahn's topological sort over a Sub-Task graph (spec §4.3).
//!
//! Ties are broken by priority then task_id so `execution_order` is
//! deterministic across identical plans.

use std::collections::{BTreeMap, VecDeque};

use travel_core::types::TaskId;
use travel_protocol::task::SubTask;

use crate::error::{PlannerError, Result};

pub fn topological_order(tasks: &[SubTask]) -> Result<Vec<TaskId>> {
    let mut in_degree: BTreeMap<TaskId, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<TaskId, Vec<TaskId>> = BTreeMap::new();

    for t in tasks {
        in_degree.entry(t.task_id.clone()).or_insert(0);
        for dep in &t.depends_on {
            *in_degree.entry(t.task_id.clone()).or_insert(0) += 1;
            dependents.entry(dep.clone()).or_default().push(t.task_id.clone());
        }
    }

    let priority_of = |id: &TaskId| -> u32 {
        tasks.iter().find(|t| &t.task_id == id).map(|t| t.priority).unwrap_or(u32::MAX)
    };

    let mut ready: Vec<TaskId> = in_degree
        .iter()
        .filter(|(_, deg)| **deg == 0)
        .map(|(id, _)| id.clone())
        .collect();
    ready.sort_by(|a, b| priority_of(a).cmp(&priority_of(b)).then(a.as_str().cmp(b.as_str())));
    let mut queue: VecDeque<TaskId> = ready.into();

    let mut order = Vec::with_capacity(tasks.len());
    while let Some(id) = queue.pop_front() {
        order.push(id.clone());

        let mut newly_ready = Vec::new();
        if let Some(children) = dependents.get(&id) {
            for child in children {
                if let Some(deg) = in_degree.get_mut(child) {
                    *deg -= 1;
                    if *deg == 0 {
                        newly_ready.push(child.clone());
                    }
                }
            }
        }
        newly_ready.sort_by(|a, b| priority_of(a).cmp(&priority_of(b)).then(a.as_str().cmp(b.as_str())));

        let mut merged: Vec<TaskId> = queue.into_iter().collect();
        merged.extend(newly_ready);
        merged.sort_by(|a, b| priority_of(a).cmp(&priority_of(b)).then(a.as_str().cmp(b.as_str())));
        queue = merged.into();
    }

    if order.len() != tasks.len() {
        let remaining: Vec<String> = tasks
            .iter()
            .map(|t| t.task_id.as_str().to_string())
            .filter(|id| !order.iter().any(|o| o.as_str() == id))
            .collect();
        return Err(PlannerError::Cycle(remaining));
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use travel_protocol::task::TaskType;

    fn task(id: &str, priority: u32, deps: &[&str]) -> SubTask {
        SubTask {
            task_id: TaskId::from(id),
            task_type: TaskType::FindSpots,
            reformulated_query: String::new(),
            parameters: serde_json::Map::new(),
            depends_on: deps.iter().map(|d| TaskId::from(*d)).collect::<HashSet<_>>(),
            priority,
            optional: false,
        }
    }

    #[test]
    fn orders_by_priority_then_dependency() {
        let tasks = vec![
            task("spots_1", 1, &[]),
            task("food_1", 1, &[]),
            task("hotel_1", 1, &[]),
            task("itinerary_1", 2, &["spots_1", "food_1", "hotel_1"]),
            task("cost_1", 3, &["itinerary_1"]),
        ];
        let order = topological_order(&tasks).unwrap();
        assert_eq!(order.len(), 5);
        assert_eq!(order.last().unwrap().as_str(), "cost_1");
        let itinerary_pos = order.iter().position(|t| t.as_str() == "itinerary_1").unwrap();
        let spots_pos = order.iter().position(|t| t.as_str() == "spots_1").unwrap();
        assert!(spots_pos < itinerary_pos);
    }

    #[test]
    fn ties_broken_by_task_id() {
        let tasks = vec![task("b_task", 1, &[]), task("a_task", 1, &[])];
        let order = topological_order(&tasks).unwrap();
        assert_eq!(order[0].as_str(), "a_task");
    }

    #[test]
    fn detects_cycle() {
        let tasks = vec![task("a", 1, &["b"]), task("b", 1, &["a"])];
        assert!(topological_order(&tasks).is_err());
    }
}
