//! The expert contract (spec §4.4): `execute(query, parameters) → Expert
//! Result`. Grounded in the teacher's `Tool` trait — a small async
//! interface with a uniform result envelope, registered by kind rather than
//! by name.

use async_trait::async_trait;
use serde_json::Map;
use travel_protocol::expert::ExpertResult;
use travel_protocol::task::TaskType;

#[async_trait]
pub trait Expert: Send + Sync {
    fn task_type(&self) -> TaskType;

    async fn execute(&self, query: &str, parameters: &Map<String, serde_json::Value>) -> ExpertResult;
}

pub fn param_str<'a>(parameters: &'a Map<String, serde_json::Value>, key: &str) -> Option<&'a str> {
    parameters.get(key).and_then(|v| v.as_str())
}

pub fn param_u64(parameters: &Map<String, serde_json::Value>, key: &str) -> Option<u64> {
    parameters.get(key).and_then(|v| v.as_u64())
}

pub fn param_array<'a>(parameters: &'a Map<String, serde_json::Value>, key: &str) -> Vec<&'a serde_json::Value> {
    parameters.get(key).and_then(|v| v.as_array()).map(|a| a.iter().collect()).unwrap_or_default()
}
