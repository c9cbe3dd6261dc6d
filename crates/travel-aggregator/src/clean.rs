//! Record pre-cleaning shared by the single-intent formatters (spec §4.7):
//! strip non-serializable fields, normalize ratings, add display fields.

use serde_json::Value;

const DESCRIPTION_MAX_CHARS: usize = 160;
const PLACEHOLDER_SPOT_IMAGE: &str = "/images/placeholder-spot.jpg";
const PLACEHOLDER_HOTEL_IMAGE: &str = "/images/placeholder-hotel.jpg";

fn strip_internal_fields(obj: &mut serde_json::Map<String, Value>) {
    for key in ["embedding", "embeddings", "vector", "_id", "internal_id"] {
        obj.remove(key);
    }
}

fn truncate_description(desc: &str) -> String {
    if desc.chars().count() <= DESCRIPTION_MAX_CHARS {
        return desc.to_string();
    }
    let truncated: String = desc.chars().take(DESCRIPTION_MAX_CHARS).collect();
    format!("{truncated}…")
}

pub fn clean_spot(record: &Value) -> Value {
    let mut value = record.clone();
    let Some(obj) = value.as_object_mut() else { return value };
    strip_internal_fields(obj);

    let rating = obj.get("rating").and_then(|v| v.as_f64()).unwrap_or(0.0);
    obj.insert("rating_display".to_string(), Value::String(format!("{rating:.1}")));

    let image_missing = obj.get("image").map(|v| v.is_null()).unwrap_or(true);
    if image_missing {
        obj.insert("image".to_string(), Value::String(PLACEHOLDER_SPOT_IMAGE.to_string()));
    }

    if let Some(desc) = obj.get("description").and_then(|v| v.as_str()).map(str::to_string) {
        obj.insert("description".to_string(), Value::String(truncate_description(&desc)));
    }

    value
}

pub fn clean_hotel(record: &Value) -> Value {
    let mut value = record.clone();
    let Some(obj) = value.as_object_mut() else { return value };
    strip_internal_fields(obj);

    let raw_rating = obj.get("rating").and_then(|v| v.as_f64()).unwrap_or(0.0);
    let rating = if raw_rating > 5.0 { raw_rating / 2.0 } else { raw_rating };
    obj.insert("rating".to_string(), Value::from(rating));
    obj.insert("rating_display".to_string(), Value::String(format!("{rating:.1}")));

    if let Some(price) = obj.get("price").and_then(|v| v.as_i64()) {
        obj.insert("price_display".to_string(), Value::String(format!("{price} VND/night")));
    }

    let image_missing = obj.get("image").map(|v| v.is_null()).unwrap_or(true);
    if image_missing {
        obj.insert("image".to_string(), Value::String(PLACEHOLDER_HOTEL_IMAGE.to_string()));
    }

    value
}

pub fn clean_food(record: &Value) -> Value {
    clean_spot(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halves_rating_stored_on_a_ten_point_scale() {
        let hotel = clean_hotel(&serde_json::json!({"rating": 9.0}));
        assert_eq!(hotel["rating"], 4.5);
    }

    #[test]
    fn keeps_rating_already_on_five_point_scale() {
        let hotel = clean_hotel(&serde_json::json!({"rating": 4.2}));
        assert_eq!(hotel["rating"], 4.2);
    }

    #[test]
    fn strips_embedding_field() {
        let cleaned = clean_spot(&serde_json::json!({"name": "X", "embedding": [0.1, 0.2]}));
        assert!(cleaned.get("embedding").is_none());
    }

    #[test]
    fn truncates_long_description() {
        let long = "a".repeat(300);
        let cleaned = clean_spot(&serde_json::json!({"description": long}));
        assert!(cleaned["description"].as_str().unwrap().ends_with('…'));
    }
}
