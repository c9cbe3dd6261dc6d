use serde::{Deserialize, Serialize};

/// Uniform envelope returned by every expert (spec §3 Expert Result).
///
/// `data` records are always JSON-serializable maps — experts are
/// responsible for stripping non-serializable fields (embeddings, internal
/// ids) before they reach this envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpertResult {
    pub expert_type: String,
    pub success: bool,
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
    #[serde(default)]
    pub summary: String,
    pub error: Option<String>,
    #[serde(default)]
    pub execution_time_ms: u64,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl ExpertResult {
    pub fn ok(expert_type: impl Into<String>, data: Vec<serde_json::Value>, summary: impl Into<String>) -> Self {
        Self {
            expert_type: expert_type.into(),
            success: true,
            data,
            summary: summary.into(),
            error: None,
            execution_time_ms: 0,
            metadata: serde_json::Map::new(),
        }
    }

    pub fn failed(expert_type: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            expert_type: expert_type.into(),
            success: false,
            data: Vec::new(),
            summary: String::new(),
            error: Some(error.into()),
            execution_time_ms: 0,
            metadata: serde_json::Map::new(),
        }
    }

    pub fn with_timing(mut self, ms: u64) -> Self {
        self.execution_time_ms = ms;
        self
    }

    /// Heuristic result-quality score in [0, 1] used by the orchestrator's
    /// intent re-ranking (spec §4.1).
    pub fn quality_score(&self, task_type: crate::task::TaskType) -> f64 {
        use crate::task::TaskType::*;
        if !self.success {
            return 0.0;
        }
        let count = self.data.len() as f64;
        match task_type {
            FindSpots => {
                let base = (count / 10.0).min(1.0);
                let bonus = self
                    .data
                    .iter()
                    .filter(|d| {
                        d.get("description").and_then(|v| v.as_str()).map(|s| !s.is_empty()).unwrap_or(false)
                            && d.get("rating").is_some()
                    })
                    .count() as f64
                    / count.max(1.0)
                    * 0.2;
                (base + bonus).min(1.0)
            }
            FindHotels => {
                let base = (count / 8.0).min(1.0);
                let bonus = self
                    .data
                    .iter()
                    .filter(|d| d.get("price").is_some() && d.get("rating").is_some())
                    .count() as f64
                    / count.max(1.0)
                    * 0.2;
                (base + bonus).min(1.0)
            }
            FindFood => (count / 5.0).min(1.0),
            CreateItinerary => {
                let days_with_activities = self
                    .data
                    .iter()
                    .filter(|d| {
                        d.get("activities")
                            .and_then(|v| v.as_array())
                            .map(|a| !a.is_empty())
                            .unwrap_or(false)
                    })
                    .count() as f64;
                ((days_with_activities / 3.0).min(1.0) + 0.1).min(1.0)
            }
            CalculateCost => {
                if self.data.iter().any(|d| d.get("total").is_some()) {
                    0.8
                } else {
                    0.0
                }
            }
            GeneralInfo => {
                if count > 0.0 {
                    0.5
                } else {
                    0.1
                }
            }
        }
    }
}
