use serde::{Deserialize, Serialize};

use travel_core::types::{BudgetLevel, CompanionType};

use crate::intent::{ContextRelation, FlowAction, Intent};

/// Wire: `{"role": "user" | "assistant", "content": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnMessage {
    pub role: String,
    pub content: String,
}

/// Request handed to the orchestrator for one turn (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRequest {
    pub messages: Vec<TurnMessage>,
    pub context: Option<serde_json::Value>,
}

/// What kind of UI payload a chunk's `ui_data` carries (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiType {
    None,
    Text,
    Greeting,
    Chitchat,
    Thanks,
    Farewell,
    Options,
    HotelCards,
    SpotCards,
    FoodCards,
    Itinerary,
    ItineraryBuilder,
    ItineraryDisplay,
    Booking,
    BookingPrompt,
    Comprehensive,
    Cost,
    CostBreakdown,
    DistanceInfo,
    SpotDetail,
    HotelDetail,
    Tips,
    MonthSelector,
    SpotSelectorTable,
    SpotSelectorUpdate,
    Error,
}

/// Chunk delivery status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkStatus {
    Partial,
    Complete,
    Error,
    Blocked,
}

/// Entity slots surfaced for observability/debugging (spec §6 metadata envelope).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntitiesEnvelope {
    pub destination: Option<String>,
    pub duration: Option<u32>,
    pub people_count: Option<u32>,
    pub budget: Option<i64>,
    pub budget_level: Option<BudgetLevel>,
    #[serde(default)]
    pub interests: Vec<String>,
    pub companion_type: Option<CompanionType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub intent: Intent,
    #[serde(default)]
    pub sub_intents: Vec<Intent>,
    pub entities: EntitiesEnvelope,
    pub confidence: f64,
    pub workflow_state: String,
    pub flow_action: Option<FlowAction>,
    pub context_relation: ContextRelation,
}

/// A single streamed (or the sole unary) response unit (spec §3 / §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseChunk {
    pub reply: String,
    pub ui_type: UiType,
    #[serde(default)]
    pub ui_data: serde_json::Map<String, serde_json::Value>,
    pub status: ChunkStatus,
    pub metadata: Option<ChunkMetadata>,
    pub context: serde_json::Value,
    pub execution_time_ms: u64,
}

impl ResponseChunk {
    pub fn complete(reply: impl Into<String>, context: serde_json::Value) -> Self {
        Self {
            reply: reply.into(),
            ui_type: UiType::Text,
            ui_data: serde_json::Map::new(),
            status: ChunkStatus::Complete,
            metadata: None,
            context,
            execution_time_ms: 0,
        }
    }

    pub fn partial(reply: impl Into<String>, context: serde_json::Value) -> Self {
        Self {
            reply: reply.into(),
            ui_type: UiType::Text,
            ui_data: serde_json::Map::new(),
            status: ChunkStatus::Partial,
            metadata: None,
            context,
            execution_time_ms: 0,
        }
    }

    pub fn error(reply: impl Into<String>, context: serde_json::Value) -> Self {
        Self {
            reply: reply.into(),
            ui_type: UiType::Error,
            ui_data: serde_json::Map::new(),
            status: ChunkStatus::Error,
            metadata: None,
            context,
            execution_time_ms: 0,
        }
    }

    pub fn with_ui(mut self, ui_type: UiType, ui_data: serde_json::Map<String, serde_json::Value>) -> Self {
        self.ui_type = ui_type;
        self.ui_data = ui_data;
        self
    }

    pub fn with_metadata(mut self, metadata: ChunkMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_timing(mut self, ms: u64) -> Self {
        self.execution_time_ms = ms;
        self
    }
}
