//! Progressive-disclosure layer (spec §4.8, C10): given the current turn's
//! sub_intents and the Expert Results gathered for them, partitions the
//! turn into answered sections (results exist) and unanswered intents
//! (parameters missing or the task failed), and synthesizes a reply that
//! concatenates answered-section blurbs with deferred-question prompts.

use travel_protocol::expert::ExpertResult;
use travel_protocol::intent::Intent;
use travel_protocol::task::TaskType;

pub struct DisclosureReport {
    pub answered_sections: Vec<String>,
    pub unanswered_intents: Vec<Intent>,
    pub reply: String,
}

/// `results` pairs each requested sub-intent's task type with its Expert
/// Result (None when no task ran for it, e.g. a missing required slot).
pub fn partition(sub_intents: &[Intent], results: &[(TaskType, Option<&ExpertResult>)]) -> DisclosureReport {
    let mut answered_sections = Vec::new();
    let mut unanswered_intents = Vec::new();
    let mut blurbs = Vec::new();
    let mut prompts = Vec::new();

    for intent in sub_intents {
        let matching = task_type_for(*intent).and_then(|tt| {
            results.iter().find(|(t, _)| *t == tt).map(|(_, r)| *r)
        });

        match matching {
            Some(Some(result)) if result.success && !result.data.is_empty() => {
                answered_sections.push(section_name(*intent));
                blurbs.push(blurb(*intent, result));
            }
            _ => {
                unanswered_intents.push(*intent);
                prompts.push(deferred_prompt(*intent));
            }
        }
    }

    let mut reply = blurbs.join("\n");
    if !prompts.is_empty() {
        if !reply.is_empty() {
            reply.push('\n');
        }
        reply.push_str(&prompts.join("\n"));
    }

    DisclosureReport { answered_sections, unanswered_intents, reply }
}

fn task_type_for(intent: Intent) -> Option<TaskType> {
    Some(match intent {
        Intent::FindSpot | Intent::MoreSpots => TaskType::FindSpots,
        Intent::FindHotel | Intent::MoreHotels => TaskType::FindHotels,
        Intent::FindFood | Intent::MoreFood => TaskType::FindFood,
        Intent::PlanTrip | Intent::ShowItinerary => TaskType::CreateItinerary,
        Intent::CalculateCost => TaskType::CalculateCost,
        _ => return None,
    })
}

fn section_name(intent: Intent) -> String {
    match intent {
        Intent::FindSpot | Intent::MoreSpots => "spots",
        Intent::FindHotel | Intent::MoreHotels => "hotels",
        Intent::FindFood | Intent::MoreFood => "food",
        Intent::PlanTrip | Intent::ShowItinerary => "itinerary",
        Intent::CalculateCost => "cost",
        _ => "other",
    }
    .to_string()
}

fn blurb(intent: Intent, result: &ExpertResult) -> String {
    format!("Found {} results for {}.", result.data.len(), section_name(intent))
}

fn deferred_prompt(intent: Intent) -> String {
    match intent {
        Intent::FindHotel | Intent::MoreHotels => {
            "I still need a destination to find hotels.".to_string()
        }
        Intent::FindFood | Intent::MoreFood => {
            "I still need a destination to find food.".to_string()
        }
        Intent::CalculateCost => "Please pick a hotel first so I can estimate cost.".to_string(),
        other => format!("I couldn't complete {:?} yet.", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_result(n: usize) -> ExpertResult {
        ExpertResult::ok(
            "spot_expert",
            (0..n).map(|i| serde_json::json!({"id": i})).collect(),
            "found spots",
        )
    }

    #[test]
    fn answered_and_unanswered_partition() {
        let spots = ok_result(3);
        let results = vec![(TaskType::FindSpots, Some(&spots))];
        let report = partition(&[Intent::FindSpot, Intent::FindHotel], &results);
        assert_eq!(report.answered_sections, vec!["spots".to_string()]);
        assert_eq!(report.unanswered_intents, vec![Intent::FindHotel]);
        assert!(report.reply.contains("spots"));
        assert!(report.reply.contains("hotels"));
    }

    #[test]
    fn empty_data_counts_as_unanswered() {
        let empty = ExpertResult::ok("spot_expert", vec![], "no spots");
        let results = vec![(TaskType::FindSpots, Some(&empty))];
        let report = partition(&[Intent::FindSpot], &results);
        assert!(report.answered_sections.is_empty());
        assert_eq!(report.unanswered_intents, vec![Intent::FindSpot]);
    }
}
