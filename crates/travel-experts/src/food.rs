//! Food Expert (spec §4.4.3).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use travel_core::collaborators::{DocumentStore, Filter};
use travel_core::geo;
use travel_protocol::expert::ExpertResult;
use travel_protocol::task::TaskType;

use crate::expert::{param_str, param_u64, Expert};

const DEFAULT_LIMIT: u64 = 10;

const STRONG_FOOD_MARKERS: &[&str] = &[
    "quán", "nhà hàng", "restaurant", "food", "ăn", "phở", "bún", "cơm", "chè", "bánh",
];
const LANDMARK_MARKERS: &[&str] = &["bảo tàng", "museum", "cầu", "bridge", "đền", "temple", "chùa"];

const REGIONAL_SPECIALTIES: &[(&str, &[&str])] = &[
    ("lao-cai", &["thắng cố", "lợn cắp nách", "cá hồi Sapa"]),
    ("khanh-hoa", &["bún cá Nha Trang", "nem nướng"]),
    ("lam-dong", &["lẩu gà lá é", "bánh tráng nướng"]),
    ("quang-nam", &["cao lầu", "mì Quảng"]),
    ("thua-thien-hue", &["bún bò Huế", "cơm hến"]),
];

pub struct FoodExpert {
    document_store: Arc<dyn DocumentStore>,
}

impl FoodExpert {
    pub fn new(document_store: Arc<dyn DocumentStore>) -> Self {
        Self { document_store }
    }
}

#[async_trait]
impl Expert for FoodExpert {
    fn task_type(&self) -> TaskType {
        TaskType::FindFood
    }

    async fn execute(&self, _query: &str, parameters: &Map<String, Value>) -> ExpertResult {
        let Some(location) = param_str(parameters, "location") else {
            return ExpertResult::failed("food_expert", "location is required");
        };
        let province = geo::normalize_location(location);
        let limit = param_u64(parameters, "limit").unwrap_or(DEFAULT_LIMIT) as usize;

        let filter = Filter {
            province_id: Some(province.clone()),
            keywords_any: STRONG_FOOD_MARKERS.iter().map(|s| s.to_string()).collect(),
            keywords_none: Vec::new(),
            price: None,
            limit: limit * 2,
        };
        let candidates = self.document_store.find("food", &filter).await.unwrap_or_default();

        let mut valid: Vec<Value> = candidates.into_iter().filter(is_food).collect();
        valid.truncate(limit);

        if valid.len() < 2 {
            if let Some((_, dishes)) = REGIONAL_SPECIALTIES.iter().find(|(p, _)| *p == province.as_str()) {
                valid.push(serde_json::json!({
                    "type": "regional_specialty",
                    "province_id": province.as_str(),
                    "dishes": dishes,
                }));
            }
        }

        let n = valid.len();
        ExpertResult::ok("food_expert", valid, format!("found {n} food results"))
    }
}

fn is_food(record: &Value) -> bool {
    let text = format!(
        "{} {}",
        record.get("name").and_then(|v| v.as_str()).unwrap_or(""),
        record.get("description").and_then(|v| v.as_str()).unwrap_or(""),
    )
    .to_lowercase();

    let has_marker = STRONG_FOOD_MARKERS.iter().any(|m| text.contains(m));
    let has_landmark = LANDMARK_MARKERS.iter().any(|m| text.contains(m));
    has_marker && !has_landmark
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
    async fn filters_out_landmark_false_positives() {
        let store = Arc::new(StubStore(vec![
            serde_json::json!({"id": "1", "name": "Quán phở Hà Nội"}),
            serde_json::json!({"id": "2", "name": "Cầu Vàng - cây cầu nổi tiếng"}),
        ]));
        let expert = FoodExpert::new(store);
        let mut params = Map::new();
        params.insert("location".to_string(), serde_json::json!("da-nang"));
        let result = expert.execute("food", &params).await;
        assert_eq!(result.data.len(), 1);
        assert_eq!(result.data[0]["id"], "1");
    }

    #[tokio::test]
    async fn falls_back_to_regional_specialty_below_two_results() {
        let store = Arc::new(StubStore(vec![serde_json::json!({"id": "1", "name": "Quán ăn nhỏ"})]));
        let expert = FoodExpert::new(store);
        let mut params = Map::new();
        params.insert("location".to_string(), serde_json::json!("sapa"));
        let result = expert.execute("food", &params).await;
        assert!(result.data.iter().any(|r| r.get("type").and_then(|t| t.as_str()) == Some("regional_specialty")));
    }
}
