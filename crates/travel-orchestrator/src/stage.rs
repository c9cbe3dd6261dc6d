//! Task-execution stage grouping (spec §4.9). Tasks are bucketed by their
//! task_id prefix into a fixed stage order; within a stage, tasks run
//! concurrently, while stages themselves run sequentially so a later
//! stage's parameter injection sees the earlier stage's merged results.

use travel_core::context::WorkflowState;
use travel_protocol::task::{ExecutionPlan, SubTask};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discovery,
    Spots,
    Hotels,
    Food,
    Itinerary,
    Cost,
}

const STAGE_ORDER: &[Stage] = &[
    Stage::Discovery,
    Stage::Spots,
    Stage::Hotels,
    Stage::Food,
    Stage::Itinerary,
    Stage::Cost,
];

fn stage_for(task: &SubTask) -> Stage {
    let prefix = task.task_id.as_str().rsplit_once('_').map(|(p, _)| p).unwrap_or(task.task_id.as_str());
    match prefix {
        "spots" => Stage::Spots,
        "hotel" => Stage::Hotels,
        "food" => Stage::Food,
        "itinerary" => Stage::Itinerary,
        "cost" => Stage::Cost,
        _ => Stage::Discovery,
    }
}

/// Stages a given workflow_state admits (spec §4.9). `None` means no
/// restriction beyond the fixed order.
fn allowed_stages(state: WorkflowState) -> Option<&'static [Stage]> {
    use WorkflowState::*;
    match state {
        ChoosingSpots => Some(&[Stage::Discovery, Stage::Spots]),
        ChoosingHotel => Some(&[Stage::Discovery, Stage::Hotels, Stage::Food, Stage::Cost]),
        CostEstimation => Some(&[Stage::Discovery, Stage::Cost]),
        Initial | GatheringInfo | ReadyToFinalize | Finalized => None,
    }
}

/// Group a plan's tasks into non-empty stages, in fixed order, filtered by
/// the current workflow_state's Anti-Greedy stage allowance.
pub fn group(plan: &ExecutionPlan, workflow_state: WorkflowState) -> Vec<(Stage, Vec<&SubTask>)> {
    let allowed = allowed_stages(workflow_state);

    STAGE_ORDER
        .iter()
        .filter(|stage| allowed.map(|a| a.contains(stage)).unwrap_or(true))
        .filter_map(|stage| {
            let tasks: Vec<&SubTask> = plan.tasks.iter().filter(|t| stage_for(t) == *stage).collect();
            if tasks.is_empty() {
                None
            } else {
                Some((*stage, tasks))
            }
        })
        .collect()
}
