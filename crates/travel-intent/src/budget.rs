//! Vietnamese free-text budget parsing (spec §4.4.8).
//!
//! Distinct from the Hotel Expert's three-tier thrifty/mid/luxury price caps:
//! this recognizes the user's own words ("khoảng 3 triệu", "dưới 2 triệu") and
//! turns them into a numeric `PriceRange`, falling back to a coarser five-tier
//! keyword table when no numeric phrase is present.

use once_cell::sync::Lazy;
use regex::Regex;
use travel_core::types::PriceRange;

const MILLION: i64 = 1_000_000;

/// Five-tier keyword vocabulary — coarser than, and independent from, the
/// Hotel Expert's thrifty/mid/luxury price-range table.
fn keyword_range(level: &str) -> Option<PriceRange> {
    match level {
        "tiết kiệm" | "tiet kiem" => Some(PriceRange::new(None, Some(2 * MILLION))),
        "bình dân" | "binh dan" => Some(PriceRange::new(Some(1 * MILLION), Some(3 * MILLION))),
        "trung bình" | "trung binh" => Some(PriceRange::new(Some(2 * MILLION), Some(6 * MILLION))),
        "cao cấp" | "cao cap" => Some(PriceRange::new(Some(5 * MILLION), Some(15 * MILLION))),
        "sang trọng" | "sang trong" => Some(PriceRange::new(Some(10 * MILLION), None)),
        _ => None,
    }
}

static LTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:dưới|không quá|tối đa)\s*([\d.,]+)\s*triệu").unwrap()
});
static GTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:trên|từ|tối thiểu)\s*([\d.,]+)\s*triệu(?!\s*(?:đến|-))").unwrap()
});
static APPROX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:khoảng|tầm|xấp xỉ)\s*([\d.,]+)\s*triệu").unwrap()
});
static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)từ\s*([\d.,]+)\s*(?:đến|-)\s*([\d.,]+)\s*triệu").unwrap()
});

fn parse_million(s: &str) -> Option<i64> {
    let cleaned: String = s.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    cleaned.parse::<f64>().ok().map(|v| (v * MILLION as f64).round() as i64)
}

/// Parse a Vietnamese budget phrase into a price range.
///
/// Tries, in order: `dưới/không quá/tối đa X triệu` (≤X), `trên/từ/tối thiểu
/// X triệu` (≥X), `khoảng/tầm/xấp xỉ X triệu` (X ± 10%), `từ X đến Y triệu`
/// (range), then a bare budget-level keyword. Idempotent: once the input no
/// longer contains a recognizable Vietnamese phrase (e.g. it is already a
/// plain number), no pattern matches and `None` is returned rather than a
/// stale re-match — callers should treat `None` as "fall back to the LLM
/// path or leave unbounded", never as an error.
pub fn parse_patterns(text: &str) -> Option<PriceRange> {
    let lower = text.to_lowercase();

    if let Some(caps) = RANGE_RE.captures(&lower) {
        let min = parse_million(&caps[1]);
        let max = parse_million(&caps[2]);
        if min.is_some() || max.is_some() {
            return Some(PriceRange::new(min, max));
        }
    }
    if let Some(caps) = LTE_RE.captures(&lower) {
        if let Some(v) = parse_million(&caps[1]) {
            return Some(PriceRange::new(None, Some(v)));
        }
    }
    if let Some(caps) = GTE_RE.captures(&lower) {
        if let Some(v) = parse_million(&caps[1]) {
            return Some(PriceRange::new(Some(v), None));
        }
    }
    if let Some(caps) = APPROX_RE.captures(&lower) {
        if let Some(v) = parse_million(&caps[1]) {
            let delta = (v as f64 * 0.1).round() as i64;
            return Some(PriceRange::new(Some(v - delta), Some(v + delta)));
        }
    }
    for level in ["tiết kiệm", "bình dân", "trung bình", "cao cấp", "sang trọng"] {
        if lower.contains(level) {
            if let Some(r) = keyword_range(level) {
                return Some(r);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_upper_bound() {
        let r = parse_patterns("tìm khách sạn dưới 2 triệu").unwrap();
        assert_eq!(r.max, Some(2 * MILLION));
        assert_eq!(r.min, None);
    }

    #[test]
    fn parses_lower_bound() {
        let r = parse_patterns("ngân sách trên 3 triệu").unwrap();
        assert_eq!(r.min, Some(3 * MILLION));
    }

    #[test]
    fn parses_approximate_band() {
        let r = parse_patterns("khoảng 5 triệu").unwrap();
        assert_eq!(r.min, Some(4_500_000));
        assert_eq!(r.max, Some(5_500_000));
    }

    #[test]
    fn parses_explicit_range() {
        let r = parse_patterns("từ 2 đến 5 triệu").unwrap();
        assert_eq!(r.min, Some(2 * MILLION));
        assert_eq!(r.max, Some(5 * MILLION));
    }

    #[test]
    fn parses_keyword_level() {
        let r = parse_patterns("muốn đi kiểu tiết kiệm").unwrap();
        assert_eq!(r.max, Some(2 * MILLION));
    }

    #[test]
    fn idempotent_past_first_pass() {
        let once = parse_patterns("khoảng 5 triệu").unwrap();
        // Re-parsing numeric-only text (no Vietnamese phrase left) yields no
        // pattern match — stable no-op, not an error.
        let as_text = format!("{}-{}", once.min.unwrap(), once.max.unwrap());
        assert!(parse_patterns(&as_text).is_none());
    }
}
