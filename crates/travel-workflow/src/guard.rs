//! StateGuard matrix (spec §4.5): blocks intents whose required workflow
//! state or Context fields are not met, producing a prompt for the missing
//! precondition rather than an error.

use travel_core::context::{Context, WorkflowState};
use travel_protocol::intent::Intent;

/// What to do when an intent is attempted outside its allowed states.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardVerdict {
    Allowed,
    /// Blocked — `prompt` names what the user needs to supply first.
    Blocked { prompt: &'static str },
}

/// Evaluate the StateGuard matrix for one intent against the current Context.
pub fn check(intent: Intent, ctx: &Context) -> GuardVerdict {
    use WorkflowState::*;

    match intent {
        Intent::CalculateCost => {
            let state_ok = matches!(ctx.workflow_state, ChoosingHotel | ReadyToFinalize | Finalized);
            // Auto-select from recent hotels using LLM+budget is permitted,
            // so the hard requirement is a destination, not a selected hotel.
            if state_ok || ctx.selected_hotel.is_some() {
                GuardVerdict::Allowed
            } else {
                GuardVerdict::Blocked { prompt: "find_hotel" }
            }
        }
        Intent::FindHotel => {
            let state_ok = matches!(ctx.workflow_state, ChoosingHotel | ChoosingSpots | Initial);
            if state_ok && ctx.destination.is_some() {
                GuardVerdict::Allowed
            } else {
                GuardVerdict::Blocked { prompt: "destination" }
            }
        }
        Intent::FindFood => {
            let non_terminal = !matches!(ctx.workflow_state, Finalized);
            if non_terminal && ctx.destination.is_some() {
                GuardVerdict::Allowed
            } else {
                GuardVerdict::Blocked { prompt: "destination" }
            }
        }
        _ => GuardVerdict::Allowed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use travel_core::types::SessionId;

    fn ctx() -> Context {
        Context::new(SessionId::from("s1"))
    }

    #[test]
    fn calculate_cost_blocked_without_hotel_or_state() {
        let c = ctx();
        assert_eq!(check(Intent::CalculateCost, &c), GuardVerdict::Blocked { prompt: "find_hotel" });
    }

    #[test]
    fn calculate_cost_allowed_with_selected_hotel() {
        let mut c = ctx();
        c.selected_hotel = Some("hotel_1".to_string());
        assert_eq!(check(Intent::CalculateCost, &c), GuardVerdict::Allowed);
    }

    #[test]
    fn calculate_cost_allowed_in_ready_to_finalize() {
        let mut c = ctx();
        c.workflow_state = WorkflowState::ReadyToFinalize;
        assert_eq!(check(Intent::CalculateCost, &c), GuardVerdict::Allowed);
    }

    #[test]
    fn find_hotel_requires_destination() {
        let c = ctx();
        assert_eq!(check(Intent::FindHotel, &c), GuardVerdict::Blocked { prompt: "destination" });
    }

    #[test]
    fn find_hotel_allowed_with_destination_in_initial() {
        let mut c = ctx();
        c.destination = Some("lao-cai".to_string());
        assert_eq!(check(Intent::FindHotel, &c), GuardVerdict::Allowed);
    }

    #[test]
    fn find_food_requires_destination_unless_terminal() {
        let mut c = ctx();
        c.workflow_state = WorkflowState::Finalized;
        assert_eq!(check(Intent::FindFood, &c), GuardVerdict::Blocked { prompt: "destination" });
    }

    #[test]
    fn unconstrained_intent_always_allowed() {
        let c = ctx();
        assert_eq!(check(Intent::Greeting, &c), GuardVerdict::Allowed);
    }
}
