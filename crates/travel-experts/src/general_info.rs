//! General Info Expert (spec §4.4.6).

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use travel_core::collaborators::{DocumentStore, Filter, LlmClient};
use travel_core::geo;
use travel_protocol::expert::ExpertResult;
use travel_protocol::task::TaskType;

use crate::expert::{param_str, Expert};

/// Phrases that signal a "where is X" question, which should search across
/// all provinces rather than the current destination only.
static CROSS_PROVINCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(ở đâu|ở nơi nào|tại đâu|where is|thuộc)").unwrap());

const TRAVEL_TIPS: &[(&str, &str)] = &[
    ("lao-cai", "Sapa gets cold year-round; bring layers and book cable-car tickets ahead of weekends."),
    ("khanh-hoa", "Nha Trang's best diving season runs from March to August."),
    ("lam-dong", "Da Lat nights are cool even in summer; a light jacket is worth packing."),
    ("quang-nam", "Hoi An's old town is pedestrian-only after 17:00 most evenings."),
    ("thua-thien-hue", "Hue's rainy season runs October to December, plan indoor sights for then."),
    ("kien-giang", "Phu Quoc ferries fill up fast around Tet, book ferry and hotel together."),
];

pub struct GeneralInfoExpert {
    llm: Option<Arc<dyn LlmClient>>,
    document_store: Arc<dyn DocumentStore>,
}

impl GeneralInfoExpert {
    pub fn new(llm: Option<Arc<dyn LlmClient>>, document_store: Arc<dyn DocumentStore>) -> Self {
        Self { llm, document_store }
    }
}

#[async_trait]
impl Expert for GeneralInfoExpert {
    fn task_type(&self) -> TaskType {
        TaskType::GeneralInfo
    }

    async fn execute(&self, query: &str, parameters: &Map<String, Value>) -> ExpertResult {
        let cross_province = CROSS_PROVINCE_RE.is_match(query);
        let location = param_str(parameters, "location");

        let filter = if cross_province {
            Filter { province_id: None, keywords_any: Vec::new(), keywords_none: Vec::new(), price: None, limit: 10 }
        } else {
            let province = location.map(geo::normalize_location);
            Filter { province_id: province, keywords_any: Vec::new(), keywords_none: Vec::new(), price: None, limit: 10 }
        };

        let mut records = self.document_store.find("spots", &filter).await.unwrap_or_default();
        records.sort_by(|a, b| {
            let ra = a.get("rating").and_then(|v| v.as_f64()).unwrap_or(0.0);
            let rb = b.get("rating").and_then(|v| v.as_f64()).unwrap_or(0.0);
            rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
        });

        if let Some(llm) = &self.llm {
            let context = serde_json::to_string(&records).unwrap_or_default();
            let prompt = format!("Question: {query}\nKnown places: {context}\nAnswer concisely in Vietnamese or English, matching the question's language.");
            if let Ok(answer) = llm.chat(&[("user".to_string(), prompt)], Some(0.3), Some(400)).await {
                let record = serde_json::json!({ "answer": answer, "sources": records });
                return ExpertResult::ok("general_info_expert", vec![record], "answered via llm");
            }
        }

        let fallback = location
            .map(geo::normalize_location)
            .and_then(|province| TRAVEL_TIPS.iter().find(|(p, _)| *p == province.as_str()))
            .map(|(_, tip)| tip.to_string())
            .unwrap_or_else(|| "No specific tips available for this destination yet.".to_string());

        let record = serde_json::json!({ "answer": fallback, "sources": records });
        ExpertResult::ok("general_info_expert", vec![record], "answered from static travel tips")
    }
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
    async fn falls_back_to_static_tip_without_llm() {
        let store = Arc::new(StubStore(vec![]));
        let expert = GeneralInfoExpert::new(None, store);
        let mut params = Map::new();
        params.insert("location".to_string(), serde_json::json!("sapa"));
        let result = expert.execute("What should I know before visiting?", &params).await;
        assert!(result.data[0]["answer"].as_str().unwrap().contains("Sapa"));
    }

    #[tokio::test]
    async fn detects_cross_province_question() {
        assert!(CROSS_PROVINCE_RE.is_match("Where is the Hoi An ancient town?"));
        assert!(CROSS_PROVINCE_RE.is_match("Chợ Bến Thành ở đâu?"));
        assert!(!CROSS_PROVINCE_RE.is_match("What is the best food in Hue?"));
    }

    #[tokio::test]
    async fn unknown_province_gets_generic_fallback() {
        let store = Arc::new(StubStore(vec![]));
        let expert = GeneralInfoExpert::new(None, store);
        let mut params = Map::new();
        params.insert("location".to_string(), serde_json::json!("unknown-place"));
        let result = expert.execute("tell me about it", &params).await;
        assert_eq!(result.data[0]["answer"], "No specific tips available for this destination yet.");
    }
}
