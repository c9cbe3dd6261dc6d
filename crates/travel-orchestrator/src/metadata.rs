//! Builds the metadata envelope attached to every Response Chunk (spec §6):
//! the detected intent(s), entity slots, and flow bookkeeping a client can
//! use for debugging or analytics without parsing `reply`.

use travel_core::context::{Context, WorkflowState};
use travel_protocol::chunk::{ChunkMetadata, EntitiesEnvelope};
use travel_protocol::intent::{ContextRelation, FlowAction, Intent, IntentRecord};

fn workflow_state_label(state: WorkflowState) -> String {
    match state {
        WorkflowState::Initial => "initial",
        WorkflowState::GatheringInfo => "gathering_info",
        WorkflowState::ChoosingSpots => "choosing_spots",
        WorkflowState::ChoosingHotel => "choosing_hotel",
        WorkflowState::ReadyToFinalize => "ready_to_finalize",
        WorkflowState::CostEstimation => "cost_estimation",
        WorkflowState::Finalized => "finalized",
    }
    .to_string()
}

/// `effective_intent` is the record's primary intent unless re-ranking (spec
/// §4.1) promoted a different stage — callers pass the post-rerank value.
pub fn build(record: &IntentRecord, ctx: &Context, effective_intent: Intent, flow_action: Option<FlowAction>) -> ChunkMetadata {
    let entities = EntitiesEnvelope {
        destination: ctx.destination.clone(),
        duration: ctx.duration,
        people_count: ctx.people_count,
        budget: ctx.budget,
        budget_level: ctx.budget_level,
        interests: record.interests.iter().cloned().collect(),
        companion_type: ctx.companion_type,
    };

    ChunkMetadata {
        intent: effective_intent,
        sub_intents: record.sub_intents.clone(),
        entities,
        confidence: record.confidence,
        workflow_state: workflow_state_label(ctx.workflow_state),
        flow_action: flow_action.or(record.flow_action),
        context_relation: record.context_relation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use travel_core::types::SessionId;

    #[test]
    fn carries_context_slots_and_effective_intent() {
        let mut ctx = Context::new(SessionId::from("s1"));
        ctx.destination = Some("quang-nam".to_string());
        ctx.duration = Some(4);
        ctx.workflow_state = WorkflowState::ChoosingHotel;

        let record = IntentRecord::fallback(Intent::FindHotel, 0.8);
        let meta = build(&record, &ctx, Intent::FindSpot, None);

        assert_eq!(meta.intent, Intent::FindSpot);
        assert_eq!(meta.entities.destination.as_deref(), Some("quang-nam"));
        assert_eq!(meta.workflow_state, "choosing_hotel");
        assert_eq!(meta.context_relation, ContextRelation::NewTopic);
    }
}
