//! Runs a single turn against an in-memory document store with no LLM or
//! search collaborator configured, to exercise the full turn pipeline
//! end-to-end without any external services.

use std::sync::Arc;

use async_trait::async_trait;
use travel_core::collaborators::{CollabResult, DocumentStore, Filter};
use travel_core::config::TravelConfig;
use travel_orchestrator::Orchestrator;
use travel_protocol::chunk::{TurnMessage, TurnRequest};

struct SeedStore;

#[async_trait]
impl DocumentStore for SeedStore {
    async fn find(&self, collection: &str, filter: &Filter) -> CollabResult<Vec<serde_json::Value>> {
        let all = match collection {
            "spots" => vec![
                serde_json::json!({"id": "spot-1", "name": "Fansipan", "category": "viewpoint", "rating": 4.8}),
                serde_json::json!({"id": "spot-2", "name": "Cat Cat Village", "category": "market", "rating": 4.5}),
            ],
            "hotels" => vec![
                serde_json::json!({"id": "hotel-1", "name": "Sapa Boutique Hotel", "price": 850_000, "rating": 4.3}),
            ],
            "food" => vec![
                serde_json::json!({"id": "food-1", "name": "Thang Co Sapa", "category": "local", "rating": 4.6}),
            ],
            _ => Vec::new(),
        };
        let limited = all.into_iter().take(filter.limit.max(1)).collect();
        Ok(limited)
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> CollabResult<Option<serde_json::Value>> {
        Ok(self.find(collection, filter).await?.into_iter().next())
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "travel_orchestrator=info".into()))
        .init();

    let config = TravelConfig::load(None).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config load failed, using defaults");
        TravelConfig::default()
    });

    let orchestrator = Orchestrator::new(None, None, None, Arc::new(SeedStore), config);

    let request = TurnRequest {
        messages: vec![TurnMessage {
            role: "user".to_string(),
            content: "Lên kế hoạch đi Sa Pa 3 ngày cho 2 người".to_string(),
        }],
        context: None,
    };

    let chunk = orchestrator.run_turn(request).await;
    println!("{}", serde_json::to_string_pretty(&chunk).unwrap());
}
