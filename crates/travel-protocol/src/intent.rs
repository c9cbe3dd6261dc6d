use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use travel_core::types::{BudgetLevel, CompanionType, PriceRange};

/// Closed set of intent labels the extractor can produce (spec §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Farewell,
    Thanks,
    Chitchat,
    PlanTrip,
    ShowItinerary,
    FindSpot,
    FindHotel,
    FindFood,
    BookHotel,
    CalculateCost,
    UpdatePeopleCount,
    GetPlaceDetails,
    GetLocationTips,
    GetLocationDetails,
    GetDistance,
    GetDirections,
    GetWeatherForecast,
    MoreSpots,
    MoreHotels,
    MoreFood,
    GetDetail,
    GeneralQa,
}

impl Intent {
    /// Precedence used to resolve conflicting detections into a single
    /// primary intent (spec §4.2).
    pub fn precedence_rank(&self) -> u8 {
        match self {
            Intent::BookHotel => 0,
            Intent::CalculateCost => 1,
            Intent::ShowItinerary => 2,
            Intent::UpdatePeopleCount => 3,
            Intent::GetPlaceDetails => 4,
            Intent::GetLocationTips => 5,
            Intent::FindHotel => 6,
            Intent::FindSpot => 7,
            Intent::FindFood => 8,
            Intent::PlanTrip => 9,
            Intent::Greeting => 10,
            Intent::Chitchat => 11,
            _ => 12,
        }
    }
}

/// Whether plan_trip should search hotels at all (spec §3 Intent Record).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Accommodation {
    #[default]
    Default,
    None,
    Optional,
}

/// A flow-control action requested by the user (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowAction {
    Continue,
    Finalize,
    Back,
    Cancel,
}

/// How the current utterance relates to the running conversation (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContextRelation {
    #[default]
    NewTopic,
    Continuation,
    Refinement,
    Reference,
}

/// The structured output of the Multi-Intent Extractor for a single turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentRecord {
    pub primary_intent: Intent,
    #[serde(default)]
    pub sub_intents: Vec<Intent>,
    pub location: Option<String>,
    pub duration: Option<u32>,
    pub budget: Option<PriceRange>,
    pub budget_level: Option<BudgetLevel>,
    pub people_count: Option<u32>,
    pub companion_type: Option<CompanionType>,
    #[serde(default)]
    pub interests: HashSet<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub accommodation: Accommodation,
    pub flow_action: Option<FlowAction>,
    #[serde(default)]
    pub context_relation: ContextRelation,
    pub confidence: f64,
    /// Present only for booking-style intents that named a specific hotel.
    pub hotel_name: Option<String>,
}

impl IntentRecord {
    /// A minimal record for when extraction degrades to a bare fallback.
    pub fn fallback(intent: Intent, confidence: f64) -> Self {
        Self {
            primary_intent: intent,
            sub_intents: Vec::new(),
            location: None,
            duration: None,
            budget: None,
            budget_level: None,
            people_count: None,
            companion_type: None,
            interests: HashSet::new(),
            keywords: Vec::new(),
            accommodation: Accommodation::Default,
            flow_action: None,
            context_relation: ContextRelation::NewTopic,
            confidence,
            hotel_name: None,
        }
    }
}
