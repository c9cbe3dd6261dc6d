//! Step 5 of the unary turn algorithm (spec §4.1): merge an Intent Record's
//! slots into Context. The extractor already backfills null slots from
//! Context before returning the record (`merge_with_context`), so most
//! fields are safe to assign back unconditionally — a destination or
//! duration detected this turn simply overrides, and one that was not
//! mentioned already carries the prior value forward.

use travel_core::context::Context;
use travel_protocol::intent::IntentRecord;

pub fn apply(ctx: &mut Context, record: &IntentRecord) {
    ctx.destination = record.location.clone();
    ctx.duration = record.duration;
    ctx.people_count = record.people_count;
    ctx.companion_type = record.companion_type;
    ctx.budget_level = record.budget_level;
    if !record.interests.is_empty() {
        ctx.interests = record.interests.clone();
    }
    if let Some(range) = &record.budget {
        ctx.budget = range.max.or(range.min);
    }
    if let Some(hotel_name) = &record.hotel_name {
        ctx.selected_hotel = Some(hotel_name.clone());
    }
    ctx.last_intent = Some(format!("{:?}", record.primary_intent).to_lowercase());
}

#[cfg(test)]
mod tests {
    use super::*;
    use travel_core::types::{PriceRange, SessionId};
    use travel_protocol::intent::Intent;

    #[test]
    fn new_destination_and_duration_override() {
        let mut ctx = Context::new(SessionId::from("s1"));
        ctx.destination = Some("lao-cai".to_string());
        ctx.duration = Some(2);

        let mut record = IntentRecord::fallback(Intent::PlanTrip, 0.9);
        record.location = Some("quang-nam".to_string());
        record.duration = Some(5);
        apply(&mut ctx, &record);

        assert_eq!(ctx.destination.as_deref(), Some("quang-nam"));
        assert_eq!(ctx.duration, Some(5));
    }

    #[test]
    fn budget_range_collapses_to_ceiling() {
        let mut ctx = Context::new(SessionId::from("s1"));
        let mut record = IntentRecord::fallback(Intent::PlanTrip, 0.9);
        record.budget = Some(PriceRange::new(Some(1_000_000), Some(5_000_000)));
        apply(&mut ctx, &record);
        assert_eq!(ctx.budget, Some(5_000_000));
    }
}
