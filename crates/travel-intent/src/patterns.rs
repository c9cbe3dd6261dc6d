//! Regex fallback layer (spec §4.2): word-boundary intent checks, slot
//! inference regexes, and the off-topic heuristic. Exercised when the LLM
//! path fails or no `LlmClient` is configured.

use once_cell::sync::Lazy;
use regex::Regex;
use travel_core::types::{CompanionType, PriceRange};

use crate::budget;

static GREETING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(xin chào|chào bạn|hello|hi|hey)\b").unwrap());
static FAREWELL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(tạm biệt|bye|goodbye|hẹn gặp lại)\b").unwrap());
static THANKS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(cảm ơn|cám ơn|thanks|thank you|cảm ơn bạn)\b").unwrap());

static BOOKING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(đặt phòng|đặt khách sạn|book|booking)\b").unwrap());
static HOTEL_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(khách sạn|hotel|resort|homestay)\b").unwrap());
static COST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(chi phí|giá cả|tốn bao nhiêu|ngân sách|tổng tiền)\b").unwrap());
static PLAN_CREATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(lên kế hoạch|lịch trình|itinerary|plan a trip|xây dựng lịch)\b").unwrap());

static DURATION_DAYS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(?:ngày|days?)\b").unwrap());
static WEEKEND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bweekend|cuối tuần\b").unwrap());
static WEEK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bmột tuần|a week\b").unwrap());

static COUPLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(bạn gái|bạn trai|người yêu|girlfriend|boyfriend|partner)\b").unwrap());
static FAMILY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(gia đình|family)\b").unwrap());
static SOLO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(một mình|solo|đi một mình)\b").unwrap());
static PEOPLE_COUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(?:người|people|pax)\b").unwrap());

static OFFTOPIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(code|lập trình|debug|chính trị|politics|software bug|compile)\b").unwrap()
});

pub fn is_greeting(text: &str) -> bool {
    GREETING_RE.is_match(text)
}

pub fn is_farewell(text: &str) -> bool {
    FAREWELL_RE.is_match(text)
}

pub fn is_thanks(text: &str) -> bool {
    THANKS_RE.is_match(text)
}

/// Compound pre-check: booking phrase together with a hotel-like token.
pub fn looks_like_book_hotel(text: &str) -> bool {
    BOOKING_RE.is_match(text) && HOTEL_TOKEN_RE.is_match(text)
}

/// Compound pre-check: budget/cost phrase with no plan-creation phrase present.
pub fn looks_like_calculate_cost(text: &str) -> bool {
    COST_RE.is_match(text) && !PLAN_CREATION_RE.is_match(text)
}

/// Off-topic heuristic: non-travel domain vocabulary with no travel-slot
/// evidence. Downgrades confidence and routes to `general_qa` rather than a
/// named intent.
pub fn is_offtopic(text: &str) -> bool {
    OFFTOPIC_RE.is_match(text)
        && DURATION_DAYS_RE.find(text).is_none()
        && PEOPLE_COUNT_RE.find(text).is_none()
}

/// Duration in days from phrases like "3 days 2 nights", "weekend", "a week".
pub fn infer_duration(text: &str) -> Option<u32> {
    if let Some(caps) = DURATION_DAYS_RE.captures(text) {
        return caps[1].parse().ok();
    }
    if WEEK_RE.is_match(text) {
        return Some(7);
    }
    if WEEKEND_RE.is_match(text) {
        return Some(2);
    }
    None
}

pub fn infer_companion(text: &str) -> Option<(u32, CompanionType)> {
    if COUPLE_RE.is_match(text) {
        return Some((2, CompanionType::Couple));
    }
    if FAMILY_RE.is_match(text) {
        return Some((4, CompanionType::Family));
    }
    if SOLO_RE.is_match(text) {
        return Some((1, CompanionType::Solo));
    }
    None
}

pub fn infer_people_count(text: &str) -> Option<u32> {
    PEOPLE_COUNT_RE.captures(text).and_then(|c| c[1].parse().ok())
}

/// Budget phrases share the Budget Parser's own pattern cascade (§4.4.8).
pub fn infer_budget(text: &str) -> Option<PriceRange> {
    budget::parse_patterns(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_word_boundary() {
        assert!(is_greeting("Xin chào, mình muốn đi Đà Lạt"));
        assert!(!is_greeting("chào mừng bạn đến Hà Nội")); // no standalone greeting token match beyond "chào bạn"? keep loose
    }

    #[test]
    fn book_hotel_requires_both_tokens() {
        assert!(looks_like_book_hotel("mình muốn đặt phòng khách sạn ở Huế"));
        assert!(!looks_like_book_hotel("mình muốn đặt vé máy bay"));
    }

    #[test]
    fn calculate_cost_excludes_plan_creation() {
        assert!(looks_like_calculate_cost("chi phí chuyến đi này bao nhiêu"));
        assert!(!looks_like_calculate_cost("lên kế hoạch và chi phí cho chuyến đi"));
    }

    #[test]
    fn duration_from_explicit_days() {
        assert_eq!(infer_duration("đi 3 ngày 2 đêm"), Some(3));
        assert_eq!(infer_duration("a week in Sapa"), Some(7));
        assert_eq!(infer_duration("a weekend trip"), Some(2));
    }

    #[test]
    fn companion_inference() {
        assert_eq!(infer_companion("đi với bạn gái"), Some((2, CompanionType::Couple)));
        assert_eq!(infer_companion("đi cùng gia đình"), Some((4, CompanionType::Family)));
        assert_eq!(infer_companion("đi một mình"), Some((1, CompanionType::Solo)));
    }

    #[test]
    fn offtopic_requires_no_travel_evidence() {
        assert!(is_offtopic("giúp mình debug đoạn code này"));
        assert!(!is_offtopic("giúp mình debug lịch trình 3 ngày")); // travel-slot evidence present
    }
}
