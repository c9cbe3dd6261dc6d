//! Trait-only seams for the external collaborators this crate depends on but
//! never implements (document store, hybrid search, LLM, weather — spec §6).
//!
//! These are dependency-injected into the orchestrator at process start
//! (Design Notes: no global singletons). Every trait is `Send + Sync` so a
//! single `Arc<dyn Trait>` can be shared across concurrently executing
//! experts within a stage.

use async_trait::async_trait;
use serde_json::Value;

use crate::types::{PriceRange, ProvinceId};

#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("collaborator call timed out after {ms}ms")]
    Timeout { ms: u64 },
    #[error("collaborator call failed: {0}")]
    Failed(String),
}

pub type CollabResult<T> = std::result::Result<T, CollaboratorError>;

/// A query against one document-store collection. Modeled as a small value
/// type rather than a free-form query language (Design Notes: no ad-hoc
/// Mongo-style dict construction scattered through expert code).
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub province_id: Option<ProvinceId>,
    pub keywords_any: Vec<String>,
    pub keywords_none: Vec<String>,
    pub price: Option<PriceRange>,
    pub limit: usize,
}

impl Filter {
    pub fn new(limit: usize) -> Self {
        Self { limit, ..Default::default() }
    }
}

/// The document store (hotels, spots_detailed, provinces_info, food collections).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: &str, filter: &Filter) -> CollabResult<Vec<Value>>;
    async fn find_one(&self, collection: &str, filter: &Filter) -> CollabResult<Option<Value>>;
}

/// Semantic + keyword hybrid search.
#[async_trait]
pub trait HybridSearch: Send + Sync {
    async fn search_spots(
        &self,
        query: &str,
        province_id: &ProvinceId,
        limit: usize,
        threshold: f64,
    ) -> CollabResult<Vec<Value>>;

    async fn search_hotels(
        &self,
        query: &str,
        province_id: &ProvinceId,
        limit: usize,
        threshold: f64,
        price: PriceRange,
    ) -> CollabResult<Vec<Value>>;
}

/// The LLM used for extraction, generation, and critique.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat(&self, messages: &[(String, String)], temperature: Option<f64>, max_tokens: Option<u32>) -> CollabResult<String>;

    /// Issue a prompt constrained to return JSON and parse it. Callers should
    /// still apply the tolerant multi-fallback parser (fenced block → brace
    /// slice → balanced-brace scan) over the raw string this wraps.
    async fn extract_json(&self, prompt: &str, system_prompt: Option<&str>) -> CollabResult<Value>;
}

#[derive(Debug, Clone)]
pub struct WeatherDay {
    pub date: String,
    pub comfort_level: String,
}

#[derive(Debug, Clone)]
pub struct WeatherForecast {
    pub overall_comfort_level: String,
    pub daily: Vec<WeatherDay>,
}

#[derive(Debug, Clone)]
pub struct BestTime {
    pub best_months: Vec<u32>,
    pub avoid_months: Vec<u32>,
    pub message: String,
}

#[async_trait]
pub trait WeatherService: Send + Sync {
    async fn get_weather(&self, location: &ProvinceId, start_date: &str, num_days: u32) -> CollabResult<WeatherForecast>;
    async fn get_best_time(&self, location: &ProvinceId) -> CollabResult<BestTime>;
}
