//! Workflow transition triggers (spec §4.5). Pure functions over the
//! Context and the resolved Intent Record; the orchestrator calls these
//! after a turn's experts have run and results have been merged in.

use travel_core::context::{Context, WorkflowState};
use travel_protocol::intent::Intent;

/// (INITIAL + plan_trip with location+duration) → CHOOSING_SPOTS.
pub fn on_plan_trip_started(ctx: &mut Context) {
    if ctx.workflow_state == WorkflowState::Initial
        && ctx.destination.is_some()
        && ctx.duration.is_some()
    {
        ctx.workflow_state = WorkflowState::ChoosingSpots;
    }
}

/// Builder reached its last day and the user confirmed → CHOOSING_HOTEL.
pub fn on_builder_finalized(ctx: &mut Context) {
    ctx.itinerary_builder = None;
    ctx.workflow_state = WorkflowState::ChoosingHotel;
}

/// A hotel is booked or selected → READY_TO_FINALIZE.
pub fn on_hotel_selected(ctx: &mut Context) {
    if ctx.selected_hotel.is_some() {
        ctx.workflow_state = WorkflowState::ReadyToFinalize;
    }
}

/// calculate_cost sets COST_ESTIMATION transiently; it reverts to the state
/// it was dispatched from once the cost response is returned, since
/// COST_ESTIMATION has no builder or finalize semantics of its own.
pub struct CostEstimationGuard {
    previous: WorkflowState,
}

impl CostEstimationGuard {
    pub fn enter(ctx: &mut Context) -> Self {
        let previous = ctx.workflow_state;
        ctx.workflow_state = WorkflowState::CostEstimation;
        Self { previous }
    }

    pub fn exit(self, ctx: &mut Context) {
        ctx.workflow_state = self.previous;
    }
}

/// Backtrack: rebuild the builder from `last_itinerary` when it was cleared
/// on finalize, and transition back to CHOOSING_SPOTS.
pub fn on_backtrack_to_spots(ctx: &mut Context) {
    if ctx.itinerary_builder.is_none() {
        if let Some(itinerary) = &ctx.last_itinerary {
            let mut days_plan = std::collections::BTreeMap::new();
            for day in &itinerary.days {
                days_plan.insert(day.day, day.spots.iter().map(|s| s.spot.clone()).collect());
            }
            ctx.itinerary_builder = Some(travel_core::context::BuilderState {
                location: itinerary.location.clone(),
                total_days: itinerary.duration,
                current_day: itinerary.duration,
                days_plan,
                available_spots: Vec::new(),
                waiting_for_start_date: false,
                waiting_for_month_selection: false,
                auto_generate_mode: false,
            });
        }
    }
    ctx.workflow_state = WorkflowState::ChoosingSpots;
}

/// True when `intent` is the kind the StateGuard matrix actually constrains.
pub fn is_guarded(intent: Intent) -> bool {
    matches!(intent, Intent::CalculateCost | Intent::FindHotel | Intent::FindFood)
}

#[cfg(test)]
mod tests {
    use super::*;
    use travel_core::types::SessionId;

    #[test]
    fn plan_trip_transitions_to_choosing_spots() {
        let mut c = Context::new(SessionId::from("s1"));
        c.destination = Some("lao-cai".to_string());
        c.duration = Some(3);
        on_plan_trip_started(&mut c);
        assert_eq!(c.workflow_state, WorkflowState::ChoosingSpots);
    }

    #[test]
    fn cost_estimation_reverts_on_exit() {
        let mut c = Context::new(SessionId::from("s1"));
        c.workflow_state = WorkflowState::ChoosingHotel;
        let guard = CostEstimationGuard::enter(&mut c);
        assert_eq!(c.workflow_state, WorkflowState::CostEstimation);
        guard.exit(&mut c);
        assert_eq!(c.workflow_state, WorkflowState::ChoosingHotel);
    }

    #[test]
    fn hotel_selection_transitions_to_ready_to_finalize() {
        let mut c = Context::new(SessionId::from("s1"));
        c.selected_hotel = Some("hotel_1".to_string());
        on_hotel_selected(&mut c);
        assert_eq!(c.workflow_state, WorkflowState::ReadyToFinalize);
    }
}
