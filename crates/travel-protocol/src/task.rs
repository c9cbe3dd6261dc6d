use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use travel_core::types::TaskId;

/// Kind of work a Sub-Task performs (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    FindSpots,
    FindHotels,
    FindFood,
    CreateItinerary,
    CalculateCost,
    GeneralInfo,
}

impl TaskType {
    /// Prefix used when minting task ids and when grouping tasks into
    /// pipeline stages (spec §4.9).
    pub fn id_prefix(&self) -> &'static str {
        match self {
            TaskType::FindSpots => "spots",
            TaskType::FindHotels => "hotel",
            TaskType::FindFood => "food",
            TaskType::CreateItinerary => "itinerary",
            TaskType::CalculateCost => "cost",
            TaskType::GeneralInfo => "general_info",
        }
    }
}

/// A unit of work produced by the Planner (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubTask {
    pub task_id: TaskId,
    pub task_type: TaskType,
    pub reformulated_query: String,
    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub depends_on: HashSet<TaskId>,
    pub priority: u32,
    #[serde(default)]
    pub optional: bool,
}

/// A dependency-ordered set of Sub-Tasks produced from one Intent Record
/// (spec §3 / §4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub tasks: Vec<SubTask>,
    pub execution_order: Vec<TaskId>,
    pub intent: String,
    pub location: Option<String>,
}

impl ExecutionPlan {
    pub fn task(&self, id: &TaskId) -> Option<&SubTask> {
        self.tasks.iter().find(|t| &t.task_id == id)
    }

    /// Tasks grouped by priority level, each group run in parallel by the
    /// executor while groups themselves run in increasing priority order.
    pub fn parallel_tasks(&self) -> Vec<(u32, Vec<&SubTask>)> {
        let mut priorities: Vec<u32> = self.tasks.iter().map(|t| t.priority).collect();
        priorities.sort_unstable();
        priorities.dedup();

        priorities
            .into_iter()
            .map(|p| {
                let group: Vec<&SubTask> = self.tasks.iter().filter(|t| t.priority == p).collect();
                (p, group)
            })
            .collect()
    }
}
