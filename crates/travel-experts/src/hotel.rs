//! Hotel Expert (spec §4.4.2).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use travel_core::collaborators::{DocumentStore, Filter, HybridSearch};
use travel_core::geo;
use travel_core::types::{BudgetLevel, PriceRange};
use travel_protocol::expert::ExpertResult;
use travel_protocol::task::TaskType;

use crate::expert::{param_str, param_u64, Expert};

const DEFAULT_LIMIT: u64 = 10;
const SEMANTIC_THRESHOLD: f64 = 0.3;
const GEO_RADIUS_KM: f64 = 30.0;

fn budget_level_range(level: BudgetLevel) -> PriceRange {
    match level {
        BudgetLevel::Thrifty => PriceRange::new(Some(0), Some(800_000)),
        BudgetLevel::Mid => PriceRange::new(Some(500_000), Some(2_500_000)),
        BudgetLevel::Luxury => PriceRange::new(Some(2_000_000), Some(50_000_000)),
    }
}

pub struct HotelExpert {
    hybrid_search: Option<Arc<dyn HybridSearch>>,
    document_store: Arc<dyn DocumentStore>,
}

impl HotelExpert {
    pub fn new(hybrid_search: Option<Arc<dyn HybridSearch>>, document_store: Arc<dyn DocumentStore>) -> Self {
        Self { hybrid_search, document_store }
    }
}

#[async_trait]
impl Expert for HotelExpert {
    fn task_type(&self) -> TaskType {
        TaskType::FindHotels
    }

    async fn execute(&self, query: &str, parameters: &Map<String, Value>) -> ExpertResult {
        let Some(location) = param_str(parameters, "location") else {
            return ExpertResult::failed("hotel_expert", "location is required");
        };
        let province = geo::normalize_location(location);
        let limit = param_u64(parameters, "limit").unwrap_or(DEFAULT_LIMIT) as usize;

        let price = resolve_price(parameters);

        let mut records = if let Some(search) = &self.hybrid_search {
            match search.search_hotels(query, &province, limit, SEMANTIC_THRESHOLD, price).await {
                Ok(r) if !r.is_empty() => r,
                _ => self.keyword_fallback(&province, price, limit).await,
            }
        } else {
            self.keyword_fallback(&province, price, limit).await
        };

        if records.is_empty() {
            records = self.geo_fallback(&province, limit).await;
        }

        records.sort_by(|a, b| {
            let ra = a.get("rating").and_then(|v| v.as_f64()).unwrap_or(0.0);
            let rb = b.get("rating").and_then(|v| v.as_f64()).unwrap_or(0.0);
            let pa = a.get("price").and_then(|v| v.as_f64()).unwrap_or(f64::MAX);
            let pb = b.get("price").and_then(|v| v.as_f64()).unwrap_or(f64::MAX);
            rb.partial_cmp(&ra)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(pa.partial_cmp(&pb).unwrap_or(std::cmp::Ordering::Equal))
        });
        records.truncate(limit);

        for record in &mut records {
            if let Some(obj) = record.as_object_mut() {
                obj.entry("price_range").or_insert(Value::String(price_range_display(price)));
            }
        }

        let n = records.len();
        ExpertResult::ok("hotel_expert", records, format!("found {n} hotels"))
    }
}

impl HotelExpert {
    async fn keyword_fallback(
        &self,
        province: &travel_core::types::ProvinceId,
        price: PriceRange,
        limit: usize,
    ) -> Vec<Value> {
        let filter = Filter {
            province_id: Some(province.clone()),
            keywords_any: Vec::new(),
            keywords_none: Vec::new(),
            price: Some(price),
            limit,
        };
        self.document_store.find("hotels", &filter).await.unwrap_or_default()
    }

    async fn geo_fallback(&self, province: &travel_core::types::ProvinceId, limit: usize) -> Vec<Value> {
        let Some(center) = geo::coords_for(province) else {
            return Vec::new();
        };
        let filter = Filter { province_id: None, keywords_any: Vec::new(), keywords_none: Vec::new(), price: None, limit: limit * 4 };
        let candidates = self.document_store.find("hotels", &filter).await.unwrap_or_default();

        let mut within_radius: Vec<(f64, Value)> = candidates
            .into_iter()
            .filter_map(|record| {
                let lat = record.get("lat").and_then(|v| v.as_f64())?;
                let lng = record.get("lng").and_then(|v| v.as_f64())?;
                let dist = geo::haversine_km(center, travel_core::types::GeoPoint { lat, lng });
                (dist <= GEO_RADIUS_KM).then_some((dist, record))
            })
            .collect();

        within_radius.sort_by(|a, b| {
            a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal).then_with(|| {
                let ra = a.1.get("rating").and_then(|v| v.as_f64()).unwrap_or(0.0);
                let rb = b.1.get("rating").and_then(|v| v.as_f64()).unwrap_or(0.0);
                rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
            })
        });

        within_radius.into_iter().map(|(_, r)| r).collect()
    }
}

/// Resolve the night-price cap: explicit budget_level wins; else a total
/// budget is taken as 30% per-night; else unbounded.
fn resolve_price(parameters: &Map<String, Value>) -> PriceRange {
    if let Some(level_str) = param_str(parameters, "budget_level") {
        if let Ok(level) = level_str.parse::<BudgetLevel>() {
            return budget_level_range(level);
        }
    }
    if let Some(total) = parameters.get("budget").and_then(|v| v.as_i64()) {
        let per_night = (total as f64 * 0.3).round() as i64;
        return PriceRange::new(None, Some(per_night));
    }
    PriceRange::unbounded()
}

fn price_range_display(price: PriceRange) -> String {
    match (price.min, price.max) {
        (Some(min), Some(max)) => format!("{min}-{max}"),
        (None, Some(max)) => format!("up to {max}"),
        (Some(min), None) => format!("from {min}"),
        (None, None) => "any".to_string(),
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
    async fn maps_budget_level_to_price_range() {
        assert_eq!(budget_level_range(BudgetLevel::Thrifty).max, Some(800_000));
        assert_eq!(budget_level_range(BudgetLevel::Luxury).min, Some(2_000_000));
    }

    #[tokio::test]
    async fn total_budget_becomes_thirty_percent_per_night() {
        let mut params = Map::new();
        params.insert("budget".to_string(), serde_json::json!(10_000_000));
        let price = resolve_price(&params);
        assert_eq!(price.max, Some(3_000_000));
    }

    #[tokio::test]
    async fn sorts_by_rating_desc_then_price_asc() {
        let store = Arc::new(StubStore(vec![
            serde_json::json!({"id": "1", "rating": 4.5, "price": 1_000_000}),
            serde_json::json!({"id": "2", "rating": 4.5, "price": 500_000}),
            serde_json::json!({"id": "3", "rating": 4.9, "price": 2_000_000}),
        ]));
        let expert = HotelExpert::new(None, store);
        let mut params = Map::new();
        params.insert("location".to_string(), serde_json::json!("lao-cai"));
        let result = expert.execute("hotels", &params).await;
        assert_eq!(result.data[0]["id"], "3");
        assert_eq!(result.data[1]["id"], "2");
    }
}
