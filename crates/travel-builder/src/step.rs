//! Core per-day step machine (spec §4.6): ask_start_date → (optional)
//! ask_month → per_day_select (loop over 1..total_days) → finalize.

use travel_core::category;
use travel_core::collaborators::WeatherService;
use travel_core::context::{BuilderState, Context, DaySpot, FinalizedItinerary, ItineraryDay, RecentRecord};
use travel_core::types::ProvinceId;
use travel_verifier::Verifier;

use crate::error::{BuilderError, Result};
use crate::input::{parse_day_input, parse_start_date_input, DayInput, StartDateInput};

const OFFER_LIMIT: usize = 10;
const CANDIDATE_CAP: usize = 20;

pub enum DayOutcome {
    Continuing,
    AdvancedDay(u32),
    Finished(FinalizedItinerary),
    AbandonedForAutoGenerate,
    Cancelled,
}

pub fn start(ctx: &mut Context, location: String, total_days: u32, candidates: Vec<RecentRecord>) {
    let available_spots: Vec<RecentRecord> = candidates.into_iter().map(enrich).take(CANDIDATE_CAP).collect();
    ctx.itinerary_builder = Some(BuilderState {
        location,
        total_days,
        current_day: 1,
        days_plan: Default::default(),
        available_spots,
        waiting_for_start_date: true,
        waiting_for_month_selection: false,
        auto_generate_mode: false,
    });
}

fn enrich(mut spot: RecentRecord) -> RecentRecord {
    let category_name = spot.category.clone().unwrap_or_default();
    if spot.best_visit_time.is_empty() {
        spot.best_visit_time = category::best_visit_time_for(&category_name, &spot.name)
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
    }
    if spot.avg_duration_min.is_none() {
        spot.avg_duration_min = Some(category::avg_duration_min_for(&category_name));
    }
    spot
}

/// The current candidate pool (≤20), excluding already-selected ids.
pub fn candidate_pool(ctx: &Context) -> Vec<RecentRecord> {
    let Some(builder) = &ctx.itinerary_builder else { return Vec::new() };
    builder.available_spots.iter().filter(|s| !ctx.selected_spot_ids.contains(&s.id)).cloned().collect()
}

/// The per-day offer (≤10). Use [`candidate_pool`] for "xem thêm".
pub fn offer_for_day(ctx: &Context) -> Vec<RecentRecord> {
    candidate_pool(ctx).into_iter().take(OFFER_LIMIT).collect()
}

pub async fn handle_start_date(
    ctx: &mut Context,
    text: &str,
    weather: Option<&dyn WeatherService>,
    province: &ProvinceId,
) -> Result<Vec<u32>> {
    if ctx.itinerary_builder.is_none() {
        return Err(BuilderError::NoActiveBuilder);
    }

    match parse_start_date_input(text) {
        StartDateInput::Explicit(date) => {
            ctx.start_date = Some(date);
            if let Some(builder) = ctx.itinerary_builder.as_mut() {
                builder.waiting_for_start_date = false;
            }
            Ok(Vec::new())
        }
        StartDateInput::DontKnow => {
            if let Some(builder) = ctx.itinerary_builder.as_mut() {
                builder.waiting_for_start_date = false;
                builder.waiting_for_month_selection = true;
            }
            if let Some(weather_service) = weather {
                if let Ok(best_time) = weather_service.get_best_time(province).await {
                    return Ok(best_time.best_months);
                }
            }
            Ok(Vec::new())
        }
    }
}

pub fn handle_month_selection(ctx: &mut Context, month: u32, current_year: i32) {
    ctx.start_date = Some(format!("{current_year}-{month:02}-01"));
    if let Some(builder) = ctx.itinerary_builder.as_mut() {
        builder.waiting_for_month_selection = false;
    }
}

/// Process one turn of the per-day select loop.
pub async fn handle_day_input(ctx: &mut Context, text: &str, verifier: &Verifier) -> Result<DayOutcome> {
    let Some(_) = &ctx.itinerary_builder else { return Err(BuilderError::NoActiveBuilder) };

    match parse_day_input(text) {
        DayInput::Auto => {
            if let Some(builder) = ctx.itinerary_builder.as_mut() {
                builder.auto_generate_mode = true;
            }
            return Ok(DayOutcome::AbandonedForAutoGenerate);
        }
        DayInput::Cancel => {
            ctx.itinerary_builder = None;
            return Ok(DayOutcome::Cancelled);
        }
        DayInput::ShowMore => return Ok(DayOutcome::Continuing),
        DayInput::Ordinals(indices) => {
            let offer = offer_for_day(ctx);
            let chosen: Vec<RecentRecord> = indices
                .into_iter()
                .filter_map(|i| offer.get(i - 1).cloned())
                .collect();
            merge_into_day(ctx, chosen);
        }
        DayInput::Names(names) => {
            let offer = offer_for_day(ctx);
            let chosen: Vec<RecentRecord> = names
                .iter()
                .filter_map(|name| offer.iter().find(|s| s.name.to_lowercase().contains(name.as_str())).cloned())
                .collect();
            merge_into_day(ctx, chosen);
        }
        DayInput::Skip | DayInput::Done => {}
    }

    advance_or_finish(ctx, verifier).await
}

fn merge_into_day(ctx: &mut Context, chosen: Vec<RecentRecord>) {
    let current_day = ctx.itinerary_builder.as_ref().map(|b| b.current_day).unwrap_or(1);
    for spot in chosen {
        if ctx.selected_spot_ids.contains(&spot.id) {
            continue;
        }
        ctx.selected_spot_ids.insert(spot.id.clone());
        ctx.selected_spots.push(DaySpot { day: current_day, spot: spot.clone(), time: None });
        if let Some(builder) = ctx.itinerary_builder.as_mut() {
            builder.days_plan.entry(current_day).or_default().push(spot);
        }
    }
}

async fn advance_or_finish(ctx: &mut Context, verifier: &Verifier) -> Result<DayOutcome> {
    let (current_day, total_days) = {
        let builder = ctx.itinerary_builder.as_mut().ok_or(BuilderError::NoActiveBuilder)?;
        builder.current_day += 1;
        (builder.current_day, builder.total_days)
    };

    if current_day > total_days {
        let finalized = finalize(ctx, verifier).await;
        Ok(DayOutcome::Finished(finalized))
    } else {
        Ok(DayOutcome::AdvancedDay(current_day))
    }
}

/// Verify, auto-fix, persist, and clear the builder (spec §4.6 step 4).
pub async fn finalize(ctx: &mut Context, verifier: &Verifier) -> FinalizedItinerary {
    let Some(builder) = ctx.itinerary_builder.clone() else {
        return FinalizedItinerary { location: String::new(), duration: 0, days: Vec::new(), estimated_cost: None, verification_verdict: None };
    };

    let raw = to_verification_json(&builder);
    let result = verifier.verify(&raw).await;
    let verdict = format!("{:?}", result.verdict).to_lowercase();
    let final_json = result.fixed_itinerary.unwrap_or(raw);

    let days = from_verification_json(&builder, &final_json);

    ctx.last_itinerary = Some(FinalizedItinerary {
        location: builder.location.clone(),
        duration: builder.total_days,
        days: days.clone(),
        estimated_cost: None,
        verification_verdict: Some(verdict.clone()),
    });
    ctx.itinerary_builder = None;
    ctx.workflow_state = travel_core::context::WorkflowState::ChoosingHotel;

    FinalizedItinerary {
        location: builder.location,
        duration: builder.total_days,
        days,
        estimated_cost: None,
        verification_verdict: Some(verdict),
    }
}

fn to_verification_json(builder: &BuilderState) -> serde_json::Value {
    let days: Vec<serde_json::Value> = builder
        .days_plan
        .iter()
        .map(|(day, spots)| {
            let activities: Vec<serde_json::Value> = spots
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let time = ["08:00", "11:00", "14:00", "17:00", "20:00"][i % 5];
                    serde_json::json!({
                        "time": time,
                        "location": s.name,
                        "category": s.category.clone().unwrap_or_default(),
                        "id": s.id,
                    })
                })
                .collect();
            serde_json::json!({ "day": day, "activities": activities })
        })
        .collect();
    serde_json::json!({ "days": days })
}

fn from_verification_json(builder: &BuilderState, value: &serde_json::Value) -> Vec<ItineraryDay> {
    let Some(days) = value.get("days").and_then(|d| d.as_array()) else { return Vec::new() };

    days.iter()
        .filter_map(|day_value| {
            let day = day_value.get("day").and_then(|v| v.as_u64())? as u32;
            let activities = day_value.get("activities").and_then(|a| a.as_array())?;
            let spots = activities
                .iter()
                .filter_map(|a| {
                    let name = a.get("location").and_then(|v| v.as_str())?;
                    let time = a.get("time").and_then(|v| v.as_str()).map(str::to_string);
                    let spot = builder
                        .days_plan
                        .get(&day)
                        .and_then(|v| v.iter().find(|s| s.name == name))?
                        .clone();
                    Some(DaySpot { day, spot, time })
                })
                .collect();
            Some(ItineraryDay { day, spots })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use travel_core::types::SessionId;

    fn sample_candidates() -> Vec<RecentRecord> {
        vec![
            RecentRecord { id: "1".into(), name: "Fansipan".into(), category: Some("viewpoint".into()), rating: Some(4.8), price: None, lat: None, lng: None, image: None, best_visit_time: vec![], avg_duration_min: None },
            RecentRecord { id: "2".into(), name: "Cat Cat Village".into(), category: Some("market".into()), rating: Some(4.5), price: None, lat: None, lng: None, image: None, best_visit_time: vec![], avg_duration_min: None },
        ]
    }

    #[tokio::test]
    async fn single_day_selection_finishes_and_persists() {
        let mut ctx = Context::new(SessionId("s1".into()));
        start(&mut ctx, "lao-cai".into(), 1, sample_candidates());

        let verifier = Verifier::new(None);
        let outcome = handle_day_input(&mut ctx, "1,2", &verifier).await.unwrap();
        assert!(matches!(outcome, DayOutcome::Finished(_)));
        assert!(ctx.itinerary_builder.is_none());
        assert!(ctx.last_itinerary.is_some());
        assert_eq!(ctx.selected_spot_ids.len(), 2);
    }

    #[tokio::test]
    async fn skip_advances_without_selecting() {
        let mut ctx = Context::new(SessionId("s2".into()));
        start(&mut ctx, "lao-cai".into(), 2, sample_candidates());

        let verifier = Verifier::new(None);
        let outcome = handle_day_input(&mut ctx, "skip", &verifier).await.unwrap();
        assert!(matches!(outcome, DayOutcome::AdvancedDay(2)));
        assert!(ctx.selected_spot_ids.is_empty());
    }

    #[tokio::test]
    async fn auto_token_abandons_builder_for_autogen() {
        let mut ctx = Context::new(SessionId("s3".into()));
        start(&mut ctx, "lao-cai".into(), 2, sample_candidates());

        let verifier = Verifier::new(None);
        let outcome = handle_day_input(&mut ctx, "auto", &verifier).await.unwrap();
        assert!(matches!(outcome, DayOutcome::AbandonedForAutoGenerate));
        assert!(ctx.itinerary_builder.as_ref().unwrap().auto_generate_mode);
    }

    #[tokio::test]
    async fn names_are_matched_by_substring() {
        let mut ctx = Context::new(SessionId("s4".into()));
        start(&mut ctx, "lao-cai".into(), 1, sample_candidates());

        let verifier = Verifier::new(None);
        handle_day_input(&mut ctx, "fansipan", &verifier).await.unwrap();
        assert!(ctx.selected_spot_ids.contains("1"));
        assert!(!ctx.selected_spot_ids.contains("2"));
    }
}
