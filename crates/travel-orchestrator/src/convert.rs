//! Converts a raw expert-result record into the display-ready
//! [`RecentRecord`] kept in Context's recent-result caches.

use serde_json::Value;
use travel_core::context::RecentRecord;

pub fn to_recent_record(value: &Value) -> RecentRecord {
    let get_str = |key: &str| value.get(key).and_then(|v| v.as_str()).map(str::to_string);
    let id = get_str("id").or_else(|| get_str("name")).unwrap_or_default();
    RecentRecord {
        id,
        name: get_str("name").unwrap_or_default(),
        category: get_str("category"),
        rating: value.get("rating").and_then(|v| v.as_f64()),
        price: value.get("price").and_then(|v| v.as_i64()),
        lat: value.get("lat").and_then(|v| v.as_f64()),
        lng: value.get("lng").and_then(|v| v.as_f64()),
        image: get_str("image"),
        best_visit_time: Vec::new(),
        avg_duration_min: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_name_when_id_missing() {
        let v = serde_json::json!({"name": "Fansipan", "rating": 4.8});
        let record = to_recent_record(&v);
        assert_eq!(record.id, "Fansipan");
        assert_eq!(record.rating, Some(4.8));
    }
}
