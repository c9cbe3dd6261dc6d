//! The per-session mutable Conversation Context (spec §3).
//!
//! Replaces the source service's dynamic per-turn dict with a strongly typed
//! record: explicit optional slots, bounded recent-result lists, and a
//! serialized form that preserves unknown fields across a round-trip.

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

use crate::types::{BudgetLevel, CompanionType, SessionId};

/// Workflow states the conversation can be in (spec §4.5). Defined here
/// rather than in `travel-workflow` because the Context itself carries one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    #[default]
    Initial,
    GatheringInfo,
    ChoosingSpots,
    ChoosingHotel,
    ReadyToFinalize,
    CostEstimation,
    Finalized,
}

/// A cleaned, display-ready record (spot, hotel, or food) kept in the
/// recent-result caches for reference resolution and day assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub best_visit_time: Vec<String>,
    #[serde(default)]
    pub avg_duration_min: Option<u32>,
}

/// A spot placed on a specific itinerary day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySpot {
    pub day: u32,
    pub spot: RecentRecord,
    pub time: Option<String>,
}

/// Mutable state of the in-progress Interactive Itinerary Builder (spec §4.6).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BuilderState {
    pub location: String,
    pub total_days: u32,
    pub current_day: u32,
    pub days_plan: std::collections::BTreeMap<u32, Vec<RecentRecord>>,
    pub available_spots: Vec<RecentRecord>,
    pub waiting_for_start_date: bool,
    pub waiting_for_month_selection: bool,
    pub auto_generate_mode: bool,
}

/// A finalized day-by-day plan (spec §3 Finalized plan).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub day: u32,
    pub spots: Vec<DaySpot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizedItinerary {
    pub location: String,
    pub duration: u32,
    pub days: Vec<ItineraryDay>,
    pub estimated_cost: Option<i64>,
    pub verification_verdict: Option<String>,
}

/// The per-session Conversation Context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    pub session_id: SessionId,

    // Slots
    pub destination: Option<String>,
    pub duration: Option<u32>,
    pub start_date: Option<String>,
    pub budget: Option<i64>,
    pub budget_level: Option<BudgetLevel>,
    pub people_count: Option<u32>,
    pub companion_type: Option<CompanionType>,
    #[serde(default)]
    pub interests: HashSet<String>,

    // Selections
    pub selected_hotel: Option<String>,
    pub selected_hotel_price: Option<i64>,
    #[serde(default)]
    pub selected_spots: Vec<DaySpot>,
    #[serde(default)]
    pub selected_spot_ids: HashSet<String>,

    // Recent results
    #[serde(default)]
    pub last_spots: VecDeque<RecentRecord>,
    #[serde(default)]
    pub last_hotels: VecDeque<RecentRecord>,
    #[serde(default)]
    pub last_foods: VecDeque<RecentRecord>,

    // Builder state
    pub itinerary_builder: Option<BuilderState>,

    // Finalized plan
    pub last_itinerary: Option<FinalizedItinerary>,

    // Workflow
    #[serde(default)]
    pub workflow_state: WorkflowState,
    pub last_intent: Option<String>,
    #[serde(default)]
    pub answered_intents: HashSet<String>,
    #[serde(default)]
    pub chat_history: VecDeque<ChatTurn>,

    /// Forward-compatibility bag: unknown fields preserved byte-for-byte
    /// across a deserialize→reserialize round-trip.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

const RECENT_CAP: usize = crate::config::DEFAULT_RECENT_RESULTS_CAP;
const HISTORY_CAP: usize = crate::config::DEFAULT_CHAT_HISTORY_CAP;

impl Context {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            destination: None,
            duration: None,
            start_date: None,
            budget: None,
            budget_level: None,
            people_count: None,
            companion_type: None,
            interests: HashSet::new(),
            selected_hotel: None,
            selected_hotel_price: None,
            selected_spots: Vec::new(),
            selected_spot_ids: HashSet::new(),
            last_spots: VecDeque::new(),
            last_hotels: VecDeque::new(),
            last_foods: VecDeque::new(),
            itinerary_builder: None,
            last_itinerary: None,
            workflow_state: WorkflowState::Initial,
            last_intent: None,
            answered_intents: HashSet::new(),
            chat_history: VecDeque::new(),
            extra: serde_json::Map::new(),
        }
    }

    /// Restore a Context from its serialized JSON form. On parse failure,
    /// returns a fresh Context for the given session rather than propagating
    /// the error (spec §7: context restoration failure falls back silently).
    pub fn restore_or_fresh(session_id: SessionId, raw: Option<&serde_json::Value>) -> Self {
        match raw {
            Some(v) => serde_json::from_value(v.clone()).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "context restoration failed, starting fresh");
                Self::new(session_id)
            }),
            None => Self::new(session_id),
        }
    }

    pub fn push_chat(&mut self, role: &str, content: &str) {
        self.chat_history.push_back(ChatTurn {
            role: role.to_string(),
            content: content.to_string(),
        });
        while self.chat_history.len() > HISTORY_CAP {
            self.chat_history.pop_front();
        }
    }

    pub fn push_recent_spots(&mut self, records: impl IntoIterator<Item = RecentRecord>) {
        for r in records {
            self.last_spots.push_back(r);
        }
        while self.last_spots.len() > RECENT_CAP {
            self.last_spots.pop_front();
        }
    }

    pub fn push_recent_hotels(&mut self, records: impl IntoIterator<Item = RecentRecord>) {
        for r in records {
            self.last_hotels.push_back(r);
        }
        while self.last_hotels.len() > RECENT_CAP {
            self.last_hotels.pop_front();
        }
    }

    pub fn push_recent_foods(&mut self, records: impl IntoIterator<Item = RecentRecord>) {
        for r in records {
            self.last_foods.push_back(r);
        }
        while self.last_foods.len() > RECENT_CAP {
            self.last_foods.pop_front();
        }
    }

    /// Invariant check (spec §8): selected_spot_ids must be a superset of
    /// every id currently placed in the builder's days_plan.
    pub fn selected_ids_cover_days_plan(&self) -> bool {
        match &self.itinerary_builder {
            Some(b) => b
                .days_plan
                .values()
                .flatten()
                .all(|s| self.selected_spot_ids.contains(&s.id)),
            None => true,
        }
    }
}
