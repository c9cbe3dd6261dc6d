use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Default candidate cap per province when offering spots (builder candidate list).
pub const DEFAULT_CANDIDATE_LIMIT: usize = 20;
/// Default per-day offer count within the candidate list.
pub const DEFAULT_DAY_OFFER_LIMIT: usize = 10;
/// Default timeout for a data-store/search collaborator call (ms).
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 10_000;
/// Default timeout for an LLM collaborator call (ms).
pub const DEFAULT_LLM_TIMEOUT_MS: u64 = 30_000;
/// Bounded length of the recent-result caches (last_spots, last_hotels, last_foods).
pub const DEFAULT_RECENT_RESULTS_CAP: usize = 10;
/// Bounded length of chat_history kept on the Context.
pub const DEFAULT_CHAT_HISTORY_CAP: usize = 40;
/// Intent re-ranking (spec §4.1): a non-primary stage below this quality is never promoted.
pub const DEFAULT_RERANK_NON_PRIMARY_MIN: f64 = 0.7;
/// A primary stage below this quality is always eligible for replacement.
pub const DEFAULT_RERANK_PRIMARY_MAX: f64 = 0.2;
/// Or, regardless of the primary's absolute quality, a gap this large promotes the non-primary stage.
pub const DEFAULT_RERANK_GAP: f64 = 0.4;

/// Top-level config (travel.toml + TRAVEL_* env overrides).
///
/// Deliberately small: the core does not own connection strings or API keys
/// for its external collaborators (document store, search, LLM, weather) —
/// those are wired in by whoever constructs the collaborator trait objects
/// and injects them into the orchestrator. This only covers the core's own
/// numeric policy knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelConfig {
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
    #[serde(default)]
    pub rerank: RerankConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            limits: LimitsConfig::default(),
            timeouts: TimeoutsConfig::default(),
            rerank: RerankConfig::default(),
            log_level: default_log_level(),
        }
    }
}

/// Thresholds the Master Orchestrator uses to decide whether a non-primary
/// stage's results should replace the primary intent's section (spec §4.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RerankConfig {
    #[serde(default = "default_rerank_non_primary_min")]
    pub non_primary_min: f64,
    #[serde(default = "default_rerank_primary_max")]
    pub primary_max: f64,
    #[serde(default = "default_rerank_gap")]
    pub gap: f64,
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self {
            non_primary_min: default_rerank_non_primary_min(),
            primary_max: default_rerank_primary_max(),
            gap: default_rerank_gap(),
        }
    }
}

fn default_rerank_non_primary_min() -> f64 {
    DEFAULT_RERANK_NON_PRIMARY_MIN
}
fn default_rerank_primary_max() -> f64 {
    DEFAULT_RERANK_PRIMARY_MAX
}
fn default_rerank_gap() -> f64 {
    DEFAULT_RERANK_GAP
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,
    #[serde(default = "default_day_offer_limit")]
    pub day_offer_limit: usize,
    #[serde(default = "default_recent_results_cap")]
    pub recent_results_cap: usize,
    #[serde(default = "default_chat_history_cap")]
    pub chat_history_cap: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            candidate_limit: default_candidate_limit(),
            day_offer_limit: default_day_offer_limit(),
            recent_results_cap: default_recent_results_cap(),
            chat_history_cap: default_chat_history_cap(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    #[serde(default = "default_store_timeout_ms")]
    pub store_ms: u64,
    #[serde(default = "default_llm_timeout_ms")]
    pub llm_ms: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            store_ms: default_store_timeout_ms(),
            llm_ms: default_llm_timeout_ms(),
        }
    }
}

fn default_candidate_limit() -> usize {
    DEFAULT_CANDIDATE_LIMIT
}
fn default_day_offer_limit() -> usize {
    DEFAULT_DAY_OFFER_LIMIT
}
fn default_recent_results_cap() -> usize {
    DEFAULT_RECENT_RESULTS_CAP
}
fn default_chat_history_cap() -> usize {
    DEFAULT_CHAT_HISTORY_CAP
}
fn default_store_timeout_ms() -> u64 {
    DEFAULT_STORE_TIMEOUT_MS
}
fn default_llm_timeout_ms() -> u64 {
    DEFAULT_LLM_TIMEOUT_MS
}
fn default_log_level() -> String {
    "info".to_string()
}

impl TravelConfig {
    /// Load config from a TOML file with TRAVEL_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.travel-core/travel.toml
    ///
    /// Missing file is not an error — every field has a default.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: TravelConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("TRAVEL_").split("_"))
            .join(figment::providers::Serialized::defaults(TravelConfig::default()))
            .extract()
            .map_err(|e| crate::error::CoreError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.travel-core/travel.toml", home)
}
