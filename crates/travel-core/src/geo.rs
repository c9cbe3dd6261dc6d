//! Destination normalization and geo-distance helpers shared by the experts
//! and the builder. Grounded in the source service's province alias table and
//! Vietnamese diacritic-folding slugifier.

use crate::types::{GeoPoint, ProvinceId};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Aliases from common spellings/slugs to canonical province ids.
///
/// TODO: externalize this table as configuration data so new destinations
/// don't require a rebuild (open question carried over from the source spec).
fn province_aliases() -> &'static HashMap<&'static str, &'static str> {
    static ALIASES: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    ALIASES.get_or_init(|| {
        HashMap::from([
            ("sapa", "lao-cai"),
            ("sa-pa", "lao-cai"),
            ("phu-quoc", "kien-giang"),
            ("hue", "thua-thien-hue"),
            ("nha-trang", "khanh-hoa"),
            ("da-lat", "lam-dong"),
            ("dalat", "lam-dong"),
            ("hoi-an", "quang-nam"),
            ("hoian", "quang-nam"),
            ("phan-thiet", "binh-thuan"),
            ("vung-tau", "ba-ria-vung-tau"),
            ("ha-long", "quang-ninh"),
            ("halong", "quang-ninh"),
            ("mui-ne", "binh-thuan"),
            ("cat-ba", "hai-phong"),
        ])
    })
}

/// Approximate (lat, lng) per well-known destination, used by the hotel
/// geo-fallback when a keyword search yields nothing.
fn location_coords() -> &'static HashMap<&'static str, GeoPoint> {
    static COORDS: OnceLock<HashMap<&'static str, GeoPoint>> = OnceLock::new();
    COORDS.get_or_init(|| {
        HashMap::from([
            ("da-nang", GeoPoint { lat: 16.0544, lng: 108.2022 }),
            ("ha-noi", GeoPoint { lat: 21.0278, lng: 105.8342 }),
            ("ho-chi-minh", GeoPoint { lat: 10.8231, lng: 106.6297 }),
            ("lao-cai", GeoPoint { lat: 22.4856, lng: 103.9707 }),
            ("kien-giang", GeoPoint { lat: 10.2270, lng: 103.9630 }),
            ("thua-thien-hue", GeoPoint { lat: 16.4637, lng: 107.5909 }),
            ("khanh-hoa", GeoPoint { lat: 12.2388, lng: 109.1967 }),
            ("lam-dong", GeoPoint { lat: 11.9404, lng: 108.4583 }),
            ("quang-nam", GeoPoint { lat: 15.8801, lng: 108.3380 }),
            ("binh-thuan", GeoPoint { lat: 10.9289, lng: 108.1021 }),
            ("ba-ria-vung-tau", GeoPoint { lat: 10.3460, lng: 107.0843 }),
            ("quang-ninh", GeoPoint { lat: 20.9515, lng: 107.0839 }),
            ("hai-phong", GeoPoint { lat: 20.7284, lng: 106.8983 }),
        ])
    })
}

pub fn coords_for(province: &ProvinceId) -> Option<GeoPoint> {
    location_coords().get(province.as_str()).copied()
}

/// Strip administrative-unit words, fold diacritics, slugify, and apply the
/// alias table. Idempotent: normalizing an already-canonical id is a no-op.
pub fn normalize_location(input: &str) -> ProvinceId {
    let stripped = strip_admin_words(input);
    let slug = slugify(&stripped);
    let canonical = province_aliases()
        .get(slug.as_str())
        .map(|s| s.to_string())
        .unwrap_or(slug);
    ProvinceId(canonical)
}

fn strip_admin_words(input: &str) -> String {
    let lower = input.trim().to_lowercase();
    let mut s = lower.as_str();
    for prefix in ["tỉnh ", "thành phố ", "tp. ", "tp "] {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest;
        }
    }
    s.to_string()
}

fn slugify(input: &str) -> String {
    let folded = fold_diacritics(input);
    let mut out = String::with_capacity(folded.len());
    let mut last_dash = false;
    for c in folded.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    out.trim_matches('-').to_string()
}

/// Fold Vietnamese diacritics to their ASCII base letters.
fn fold_diacritics(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            'à' | 'á' | 'ả' | 'ã' | 'ạ' | 'ă' | 'ằ' | 'ắ' | 'ẳ' | 'ẵ' | 'ặ' | 'â' | 'ầ' | 'ấ'
            | 'ẩ' | 'ẫ' | 'ậ' => 'a',
            'è' | 'é' | 'ẻ' | 'ẽ' | 'ẹ' | 'ê' | 'ề' | 'ế' | 'ể' | 'ễ' | 'ệ' => 'e',
            'ì' | 'í' | 'ỉ' | 'ĩ' | 'ị' => 'i',
            'ò' | 'ó' | 'ỏ' | 'õ' | 'ọ' | 'ô' | 'ồ' | 'ố' | 'ổ' | 'ỗ' | 'ộ' | 'ơ' | 'ờ' | 'ớ'
            | 'ở' | 'ỡ' | 'ợ' => 'o',
            'ù' | 'ú' | 'ủ' | 'ũ' | 'ụ' | 'ư' | 'ừ' | 'ứ' | 'ử' | 'ữ' | 'ự' => 'u',
            'ỳ' | 'ý' | 'ỷ' | 'ỹ' | 'ỵ' => 'y',
            'đ' => 'd',
            'À' | 'Á' | 'Ả' | 'Ã' | 'Ạ' | 'Ă' | 'Â' => 'a',
            'Đ' => 'd',
            other => other,
        })
        .collect()
}

/// Great-circle distance in kilometers (Earth radius 6371 km).
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let r = 6371.0_f64;
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * r * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_common_aliases() {
        assert_eq!(normalize_location("Sa Pa").as_str(), "lao-cai");
        assert_eq!(normalize_location("Phú Quốc").as_str(), "kien-giang");
        assert_eq!(normalize_location("Hội An").as_str(), "quang-nam");
    }

    #[test]
    fn strips_administrative_prefixes() {
        assert_eq!(normalize_location("Thành phố Đà Nẵng").as_str(), "da-nang");
        assert_eq!(normalize_location("Tỉnh Lâm Đồng").as_str(), "lam-dong");
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_location("Sa Pa");
        let twice = normalize_location(once.as_str());
        assert_eq!(once, twice);
    }

    #[test]
    fn haversine_zero_distance_for_same_point() {
        let p = GeoPoint { lat: 16.0544, lng: 108.2022 };
        assert!(haversine_km(p, p) < 1e-6);
    }

    #[test]
    fn haversine_known_distance_is_reasonable() {
        let hanoi = GeoPoint { lat: 21.0278, lng: 105.8342 };
        let danang = GeoPoint { lat: 16.0544, lng: 108.2022 };
        let d = haversine_km(hanoi, danang);
        // Straight-line distance is roughly 600-650 km.
        assert!(d > 500.0 && d < 700.0, "unexpected distance: {d}");
    }
}
