//! Multi-Intent Extractor (C3, spec §4.2).
//!
//! Three extraction paths tried in order: high-confidence compound
//! pre-checks, LLM extraction (merged against Context so null slots
//! inherit), and a regex fallback when the LLM path fails or no client is
//! configured. The final primary intent is resolved by precedence rank
//! when more than one candidate fires.

use std::collections::HashSet;
use std::sync::Arc;

use travel_core::collaborators::LlmClient;
use travel_core::context::Context;
use travel_protocol::intent::{Accommodation, ContextRelation, FlowAction, Intent, IntentRecord};

use crate::error::{IntentError, Result};
use crate::patterns;

const LLM_SYSTEM_PROMPT: &str = "You are a travel intent classifier for a Vietnamese-language trip planning assistant. Given the user's message and conversation context, return a JSON object with: primary_intent (one of the enumerated labels), sub_intents, location, duration, budget_min, budget_max, budget_level, people_count, companion_type, interests, keywords, accommodation, flow_action, context_relation, confidence, hotel_name. Use null for any slot not present in the message.";

pub struct MultiIntentExtractor {
    llm: Option<Arc<dyn LlmClient>>,
}

impl MultiIntentExtractor {
    pub fn new(llm: Option<Arc<dyn LlmClient>>) -> Self {
        Self { llm }
    }

    pub async fn extract(&self, utterance: &str, context: &Context) -> Result<IntentRecord> {
        if utterance.trim().is_empty() {
            return Err(IntentError::Empty);
        }

        if let Some(record) = self.high_confidence_precheck(utterance) {
            return Ok(self.merge_with_context(record, context));
        }

        if let Some(llm) = &self.llm {
            match self.extract_via_llm(llm.as_ref(), utterance, context).await {
                Ok(record) => return Ok(self.merge_with_context(record, context)),
                Err(e) => {
                    tracing::warn!(error = %e, "llm extraction failed, falling back to regex");
                }
            }
        }

        let record = self.extract_via_regex(utterance);
        Ok(self.merge_with_context(record, context))
    }

    /// Compound patterns with confidence 0.95, checked before any LLM call.
    fn high_confidence_precheck(&self, text: &str) -> Option<IntentRecord> {
        if patterns::looks_like_book_hotel(text) {
            let mut r = IntentRecord::fallback(Intent::BookHotel, 0.95);
            r.keywords = vec!["book_hotel".to_string()];
            return Some(r);
        }
        if patterns::looks_like_calculate_cost(text) {
            return Some(IntentRecord::fallback(Intent::CalculateCost, 0.95));
        }
        None
    }

    async fn extract_via_llm(
        &self,
        llm: &dyn LlmClient,
        utterance: &str,
        context: &Context,
    ) -> Result<IntentRecord> {
        let prompt = format!(
            "Conversation context: destination={:?}, duration={:?}, people_count={:?}, workflow_state={:?}\nUser message: {}",
            context.destination, context.duration, context.people_count, context.workflow_state, utterance
        );
        let value = llm
            .extract_json(&prompt, Some(LLM_SYSTEM_PROMPT))
            .await
            .map_err(|e| IntentError::Llm(e.to_string()))?;
        parse_llm_record(&value).ok_or(IntentError::Empty)
    }

    /// Greeting/thanks/farewell word-boundary checks, off-topic heuristics,
    /// and the ordinal/duration/budget/people-count/companion regexes.
    fn extract_via_regex(&self, text: &str) -> IntentRecord {
        let candidates = self.regex_candidates(text);
        let mut best = candidates
            .into_iter()
            .min_by_key(|(intent, _)| intent.precedence_rank())
            .map(|(intent, confidence)| IntentRecord::fallback(intent, confidence))
            .unwrap_or_else(|| {
                if patterns::is_offtopic(text) {
                    IntentRecord::fallback(Intent::GeneralQa, 0.3)
                } else {
                    IntentRecord::fallback(Intent::GeneralQa, 0.4)
                }
            });

        best.duration = patterns::infer_duration(text);
        best.budget = patterns::infer_budget(text);
        if let Some((count, companion)) = patterns::infer_companion(text) {
            best.people_count = Some(count);
            best.companion_type = Some(companion);
        } else if let Some(count) = patterns::infer_people_count(text) {
            best.people_count = Some(count);
        }
        best
    }

    fn regex_candidates(&self, text: &str) -> Vec<(Intent, f64)> {
        let mut out = Vec::new();
        if patterns::is_greeting(text) {
            out.push((Intent::Greeting, 0.85));
        }
        if patterns::is_farewell(text) {
            out.push((Intent::Farewell, 0.85));
        }
        if patterns::is_thanks(text) {
            out.push((Intent::Thanks, 0.85));
        }
        if patterns::looks_like_book_hotel(text) {
            out.push((Intent::BookHotel, 0.9));
        }
        if patterns::looks_like_calculate_cost(text) {
            out.push((Intent::CalculateCost, 0.9));
        }
        out
    }

    /// Merge the Intent Record's slots into Context-derived defaults so null
    /// LLM/regex outputs inherit prior slots. A new destination or duration
    /// explicitly present in the record overrides the context's value.
    fn merge_with_context(&self, mut record: IntentRecord, context: &Context) -> IntentRecord {
        if record.location.is_none() {
            record.location = context.destination.clone();
        }
        if record.duration.is_none() {
            record.duration = context.duration;
        }
        if record.people_count.is_none() {
            record.people_count = context.people_count;
        }
        if record.companion_type.is_none() {
            record.companion_type = context.companion_type;
        }
        if record.budget_level.is_none() {
            record.budget_level = context.budget_level;
        }
        if record.interests.is_empty() {
            record.interests = context.interests.clone();
        }

        record.context_relation = classify_relation(&record, context);
        record
    }
}

fn classify_relation(record: &IntentRecord, context: &Context) -> ContextRelation {
    if context.last_intent.is_none() {
        return ContextRelation::NewTopic;
    }
    if record.location.is_some()
        && record.location != context.destination
        && context.destination.is_some()
    {
        return ContextRelation::NewTopic;
    }
    match record.primary_intent {
        Intent::MoreSpots | Intent::MoreHotels | Intent::MoreFood | Intent::GetDetail => {
            ContextRelation::Reference
        }
        Intent::UpdatePeopleCount => ContextRelation::Refinement,
        _ => ContextRelation::Continuation,
    }
}

fn parse_llm_record(value: &serde_json::Value) -> Option<IntentRecord> {
    let obj = value.as_object()?;
    let primary_intent = obj
        .get("primary_intent")
        .and_then(|v| v.as_str())
        .and_then(parse_intent_label)?;

    let sub_intents = obj
        .get("sub_intents")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str())
                .filter_map(parse_intent_label)
                .collect()
        })
        .unwrap_or_default();

    let interests: HashSet<String> = obj
        .get("interests")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_str().map(String::from)).collect())
        .unwrap_or_default();

    let keywords: Vec<String> = obj
        .get("keywords")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_str().map(String::from)).collect())
        .unwrap_or_default();

    let budget_min = obj.get("budget_min").and_then(|v| v.as_i64());
    let budget_max = obj.get("budget_max").and_then(|v| v.as_i64());
    let budget = if budget_min.is_some() || budget_max.is_some() {
        Some(travel_core::types::PriceRange::new(budget_min, budget_max))
    } else {
        None
    };

    Some(IntentRecord {
        primary_intent,
        sub_intents,
        location: obj.get("location").and_then(|v| v.as_str()).map(String::from),
        duration: obj.get("duration").and_then(|v| v.as_u64()).map(|d| d as u32),
        budget,
        budget_level: obj
            .get("budget_level")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok()),
        people_count: obj.get("people_count").and_then(|v| v.as_u64()).map(|n| n as u32),
        companion_type: obj.get("companion_type").and_then(|v| v.as_str()).and_then(parse_companion),
        interests,
        keywords,
        accommodation: obj
            .get("accommodation")
            .and_then(|v| v.as_str())
            .map(parse_accommodation)
            .unwrap_or_default(),
        flow_action: obj.get("flow_action").and_then(|v| v.as_str()).and_then(parse_flow_action),
        context_relation: ContextRelation::default(),
        confidence: obj.get("confidence").and_then(|v| v.as_f64()).unwrap_or(0.6),
        hotel_name: obj.get("hotel_name").and_then(|v| v.as_str()).map(String::from),
    })
}

fn parse_intent_label(s: &str) -> Option<Intent> {
    use Intent::*;
    Some(match s {
        "greeting" => Greeting,
        "farewell" => Farewell,
        "thanks" => Thanks,
        "chitchat" => Chitchat,
        "plan_trip" => PlanTrip,
        "show_itinerary" => ShowItinerary,
        "find_spot" => FindSpot,
        "find_hotel" => FindHotel,
        "find_food" => FindFood,
        "book_hotel" => BookHotel,
        "calculate_cost" => CalculateCost,
        "update_people_count" => UpdatePeopleCount,
        "get_place_details" => GetPlaceDetails,
        "get_location_tips" => GetLocationTips,
        "get_location_details" => GetLocationDetails,
        "get_distance" => GetDistance,
        "get_directions" => GetDirections,
        "get_weather_forecast" => GetWeatherForecast,
        "more_spots" => MoreSpots,
        "more_hotels" => MoreHotels,
        "more_food" => MoreFood,
        "get_detail" => GetDetail,
        "general_qa" => GeneralQa,
        _ => return None,
    })
}

fn parse_companion(s: &str) -> Option<travel_core::types::CompanionType> {
    use travel_core::types::CompanionType::*;
    Some(match s {
        "solo" => Solo,
        "couple" => Couple,
        "family" => Family,
        "friends" => Friends,
        "business" => Business,
        _ => return None,
    })
}

fn parse_accommodation(s: &str) -> Accommodation {
    match s {
        "none" => Accommodation::None,
        "optional" => Accommodation::Optional,
        _ => Accommodation::Default,
    }
}

fn parse_flow_action(s: &str) -> Option<FlowAction> {
    Some(match s {
        "continue" => FlowAction::Continue,
        "finalize" => FlowAction::Finalize,
        "back" => FlowAction::Back,
        "cancel" => FlowAction::Cancel,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use travel_core::types::SessionId;

    fn ctx() -> Context {
        Context::new(SessionId::from("test-session"))
    }

    #[tokio::test]
    async fn high_confidence_precheck_skips_llm() {
        let ex = MultiIntentExtractor::new(None);
        let record = ex
            .extract("mình muốn đặt phòng khách sạn ở Đà Lạt", &ctx())
            .await
            .unwrap();
        assert_eq!(record.primary_intent, Intent::BookHotel);
        assert!(record.confidence >= 0.95);
    }

    #[tokio::test]
    async fn calculate_cost_precheck_without_plan_phrase() {
        let ex = MultiIntentExtractor::new(None);
        let record = ex.extract("chi phí chuyến đi này bao nhiêu", &ctx()).await.unwrap();
        assert_eq!(record.primary_intent, Intent::CalculateCost);
    }

    #[tokio::test]
    async fn regex_fallback_greeting() {
        let ex = MultiIntentExtractor::new(None);
        let record = ex.extract("xin chào", &ctx()).await.unwrap();
        assert_eq!(record.primary_intent, Intent::Greeting);
    }

    #[tokio::test]
    async fn empty_utterance_errors() {
        let ex = MultiIntentExtractor::new(None);
        let err = ex.extract("   ", &ctx()).await.unwrap_err();
        assert!(matches!(err, IntentError::Empty));
    }

    #[tokio::test]
    async fn inherits_destination_from_context() {
        let ex = MultiIntentExtractor::new(None);
        let mut c = ctx();
        c.destination = Some("lao-cai".to_string());
        let record = ex.extract("tìm khách sạn giá rẻ", &c).await.unwrap();
        assert_eq!(record.location.as_deref(), Some("lao-cai"));
    }
}
