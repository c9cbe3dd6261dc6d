//! Spot Expert (spec §4.4.1).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use travel_core::collaborators::{DocumentStore, Filter, HybridSearch};
use travel_core::geo;
use travel_protocol::expert::ExpertResult;
use travel_protocol::task::TaskType;

use crate::expert::{param_array, param_str, param_u64, Expert};

const DEFAULT_LIMIT: u64 = 10;
const SEMANTIC_THRESHOLD: f64 = 0.3;

pub struct SpotExpert {
    hybrid_search: Option<Arc<dyn HybridSearch>>,
    document_store: Arc<dyn DocumentStore>,
}

impl SpotExpert {
    pub fn new(hybrid_search: Option<Arc<dyn HybridSearch>>, document_store: Arc<dyn DocumentStore>) -> Self {
        Self { hybrid_search, document_store }
    }
}

#[async_trait]
impl Expert for SpotExpert {
    fn task_type(&self) -> TaskType {
        TaskType::FindSpots
    }

    async fn execute(&self, query: &str, parameters: &Map<String, Value>) -> ExpertResult {
        let Some(location) = param_str(parameters, "location") else {
            return ExpertResult::failed("spot_expert", "location is required");
        };
        let province = geo::normalize_location(location);
        let limit = param_u64(parameters, "limit").unwrap_or(DEFAULT_LIMIT) as usize;
        let keywords: Vec<String> = param_array(parameters, "keywords")
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect();

        let mut records = if let Some(search) = &self.hybrid_search {
            match search.search_spots(query, &province, limit, SEMANTIC_THRESHOLD).await {
                Ok(r) if !r.is_empty() => r,
                _ => self.document_store_fallback(&province, &keywords, limit).await,
            }
        } else {
            self.document_store_fallback(&province, &keywords, limit).await
        };

        for record in &mut records {
            enrich(record);
        }

        records.sort_by(|a, b| {
            let ra = a.get("rating").and_then(|v| v.as_f64()).unwrap_or(0.0);
            let rb = b.get("rating").and_then(|v| v.as_f64()).unwrap_or(0.0);
            rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
        });
        records.truncate(limit);

        if records.is_empty() {
            ExpertResult::ok("spot_expert", records, "no spots found")
        } else {
            let n = records.len();
            ExpertResult::ok("spot_expert", records, format!("found {n} spots"))
        }
    }
}

impl SpotExpert {
    async fn document_store_fallback(
        &self,
        province: &travel_core::types::ProvinceId,
        keywords: &[String],
        limit: usize,
    ) -> Vec<Value> {
        let filter = Filter {
            province_id: Some(province.clone()),
            keywords_any: keywords.to_vec(),
            keywords_none: Vec::new(),
            price: None,
            limit,
        };
        self.document_store.find("spots_detailed", &filter).await.unwrap_or_default()
    }
}

fn enrich(record: &mut Value) {
    let obj = match record.as_object_mut() {
        Some(o) => o,
        None => return,
    };
    obj.entry("rating").or_insert(Value::from(4.0));
    obj.entry("image").or_insert(Value::Null);
    obj.entry("description").or_insert(Value::String(String::new()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use travel_core::collaborators::CollabResult;

    struct StubStore(Vec<Value>);

    #[async_trait]
    impl DocumentStore for StubStore {
        async fn find(&self, _collection: &str, _filter: &Filter) -> CollabResult<Vec<Value>> {
            Ok(self.0.clone())
        }
        async fn find_one(&self, _collection: &str, _filter: &Filter) -> CollabResult<Option<Value>> {
            Ok(self.0.first().cloned())
        }
    }

    #[tokio::test]
    async fn falls_back_to_document_store_without_hybrid_search() {
        let store = Arc::new(StubStore(vec![
            serde_json::json!({"id": "1", "name": "Hang Mua", "rating": 4.8}),
            serde_json::json!({"id": "2", "name": "Trang An", "rating": 4.9}),
        ]));
        let expert = SpotExpert::new(None, store);
        let mut params = Map::new();
        params.insert("location".to_string(), serde_json::json!("ninh-binh"));
        let result = expert.execute("spots", &params).await;
        assert!(result.success);
        assert_eq!(result.data.len(), 2);
        assert_eq!(result.data[0]["id"], "2"); // sorted rating desc
    }

    #[tokio::test]
    async fn requires_location() {
        let store = Arc::new(StubStore(vec![]));
        let expert = SpotExpert::new(None, store);
        let result = expert.execute("spots", &Map::new()).await;
        assert!(!result.success);
    }

    #[tokio::test]
    async fn enriches_missing_fields() {
        let store = Arc::new(StubStore(vec![serde_json::json!({"id": "1", "name": "X"})]));
        let expert = SpotExpert::new(None, store);
        let mut params = Map::new();
        params.insert("location".to_string(), serde_json::json!("sapa"));
        let result = expert.execute("spots", &params).await;
        assert!(result.data[0].get("rating").is_some());
    }
}
