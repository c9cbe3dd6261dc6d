//! Anti-Greedy flow-control gate (spec §4.5), applied after intent
//! extraction and before planning. Mirrors the hook engine's priority-sorted
//! rule evaluation, but as a synchronous pure function over one turn: each
//! rule may short-circuit to the builder, filter sub_intents, or pass
//! through unchanged.

use travel_core::context::{Context, WorkflowState};
use travel_protocol::intent::{Intent, IntentRecord};

/// Intents that bypass the builder short-circuit even while a builder is
/// in progress (spec §4.5 fixed bypass set).
const BUILDER_BYPASS: &[Intent] = &[
    Intent::CalculateCost,
    Intent::GetDistance,
    Intent::GetDirections,
    Intent::GetWeatherForecast,
    Intent::ShowItinerary,
    Intent::BookHotel,
    Intent::GetLocationTips,
    Intent::GetPlaceDetails,
];

const FOOD_TOKENS: &[&str] = &["ăn", "quán", "food", "nhà hàng", "restaurant"];

#[derive(Debug, Clone)]
pub enum GateDecision {
    /// Proceed to planning with the (possibly filtered) record.
    Proceed(IntentRecord),
    /// Route directly to the builder's continuation handler.
    ShortCircuitToBuilder,
    /// Backtrack detected: rebuild the builder from last_itinerary and
    /// transition back to CHOOSING_SPOTS.
    BacktrackToBuilder,
}

impl PartialEq for GateDecision {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (GateDecision::ShortCircuitToBuilder, GateDecision::ShortCircuitToBuilder)
                | (GateDecision::BacktrackToBuilder, GateDecision::BacktrackToBuilder)
        )
    }
}

/// Apply Anti-Greedy rules. `utterance` is the raw text, needed for the food
/// token and backtrack-signal checks.
pub fn apply(mut record: IntentRecord, ctx: &Context, utterance: &str) -> GateDecision {
    if ctx.workflow_state == WorkflowState::ChoosingHotel && signals_add_modify_spots(utterance) {
        return GateDecision::BacktrackToBuilder;
    }

    let builder_active = ctx.itinerary_builder.is_some();
    let in_builder_states = matches!(
        ctx.workflow_state,
        WorkflowState::ChoosingSpots | WorkflowState::GatheringInfo
    );
    if builder_active
        && in_builder_states
        && ctx.workflow_state != WorkflowState::Finalized
        && !BUILDER_BYPASS.contains(&record.primary_intent)
    {
        return GateDecision::ShortCircuitToBuilder;
    }

    if record.primary_intent == Intent::PlanTrip && ctx.workflow_state == WorkflowState::Initial {
        record.sub_intents.retain(|i| *i != Intent::FindHotel && *i != Intent::FindFood);
    }

    if ctx.workflow_state == WorkflowState::ChoosingHotel {
        let has_food_tokens = FOOD_TOKENS.iter().any(|t| utterance.to_lowercase().contains(t));
        if !has_food_tokens {
            record.sub_intents.retain(|i| *i != Intent::FindFood);
        }
    }

    GateDecision::Proceed(record)
}

fn signals_add_modify_spots(utterance: &str) -> bool {
    let lower = utterance.to_lowercase();
    ["thêm địa điểm", "sửa địa điểm", "đổi địa điểm", "add spot", "modify spot"]
        .iter()
        .any(|p| lower.contains(p))
}
