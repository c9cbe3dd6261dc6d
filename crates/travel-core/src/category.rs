//! Time-slot and category tables shared by the Itinerary Verifier's rule
//! phase and the Builder's candidate-selector enrichment (spec §4.4.7 /
//! §4.6), so a spot's inferred best time always agrees with how it is later
//! checked.

use std::fmt;

/// 6-slot mapping of the day (spec §4.4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSlot {
    EarlyMorning,
    Morning,
    Midday,
    Afternoon,
    Evening,
    Night,
}

impl TimeSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::EarlyMorning => "early_morning",
            TimeSlot::Morning => "morning",
            TimeSlot::Midday => "midday",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Evening => "evening",
            TimeSlot::Night => "night",
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Map an "HH:MM" time string to its slot. Unparseable times fall back to
/// `Midday`, the widest-tolerance slot.
pub fn slot_for_time(time: &str) -> TimeSlot {
    let hour: u32 = time.split(':').next().and_then(|h| h.parse().ok()).unwrap_or(12);
    match hour {
        5..=6 => TimeSlot::EarlyMorning,
        7..=10 => TimeSlot::Morning,
        11..=13 => TimeSlot::Midday,
        14..=16 => TimeSlot::Afternoon,
        17..=20 => TimeSlot::Evening,
        _ => TimeSlot::Night,
    }
}

const ALL_SLOTS: &[TimeSlot] = &[
    TimeSlot::EarlyMorning,
    TimeSlot::Morning,
    TimeSlot::Midday,
    TimeSlot::Afternoon,
    TimeSlot::Evening,
    TimeSlot::Night,
];

/// Category → allowed slots. Unknown categories are unconstrained.
pub fn allowed_slots_for_category(category: &str) -> Vec<TimeSlot> {
    let c = category.to_lowercase();
    match c.as_str() {
        "beach" => vec![TimeSlot::Morning, TimeSlot::Afternoon],
        "museum" => vec![TimeSlot::Morning, TimeSlot::Midday, TimeSlot::Afternoon],
        "temple" | "pagoda" => vec![TimeSlot::EarlyMorning, TimeSlot::Morning, TimeSlot::Midday],
        "market" => vec![TimeSlot::Morning, TimeSlot::Midday],
        "viewpoint" | "mountain" => vec![TimeSlot::EarlyMorning, TimeSlot::Morning],
        "bar" | "nightlife" | "club" => vec![TimeSlot::Evening, TimeSlot::Night],
        "night_market" => vec![TimeSlot::Evening, TimeSlot::Night],
        _ => ALL_SLOTS.to_vec(),
    }
}

/// Substring markers over a spot's name, checked only when the category
/// table didn't already constrain the slot (a category match short-circuits
/// this check).
pub fn allowed_slots_for_name(name: &str) -> Option<Vec<TimeSlot>> {
    let n = name.to_lowercase();
    if n.contains("sunrise") || n.contains("bình minh") {
        Some(vec![TimeSlot::EarlyMorning])
    } else if n.contains("sunset") || n.contains("hoàng hôn") {
        Some(vec![TimeSlot::Evening])
    } else if n.contains("night market") || n.contains("chợ đêm") {
        Some(vec![TimeSlot::Evening, TimeSlot::Night])
    } else {
        None
    }
}

/// Average visit duration in minutes, used by the Builder's enrichment.
pub fn avg_duration_min_for(category: &str) -> u32 {
    match category.to_lowercase().as_str() {
        "beach" => 120,
        "museum" => 90,
        "temple" | "pagoda" => 60,
        "market" => 60,
        "viewpoint" | "mountain" => 45,
        "bar" | "nightlife" | "club" => 120,
        _ => 60,
    }
}

/// Best-visit-time inference for a spot lacking the field: category table
/// first, then substring cues on the name, then all daytime slots.
pub fn best_visit_time_for(category: &str, name: &str) -> Vec<TimeSlot> {
    let category_slots = allowed_slots_for_category(category);
    if category_slots.len() < ALL_SLOTS.len() {
        return category_slots;
    }
    if let Some(name_slots) = allowed_slots_for_name(name) {
        return name_slots;
    }
    vec![TimeSlot::Morning, TimeSlot::Midday, TimeSlot::Afternoon]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_boundaries() {
        assert_eq!(slot_for_time("05:30"), TimeSlot::EarlyMorning);
        assert_eq!(slot_for_time("08:00"), TimeSlot::Morning);
        assert_eq!(slot_for_time("12:00"), TimeSlot::Midday);
        assert_eq!(slot_for_time("15:00"), TimeSlot::Afternoon);
        assert_eq!(slot_for_time("19:00"), TimeSlot::Evening);
        assert_eq!(slot_for_time("23:00"), TimeSlot::Night);
    }

    #[test]
    fn unknown_category_is_unconstrained() {
        assert_eq!(allowed_slots_for_category("skatepark").len(), 6);
    }

    #[test]
    fn name_markers_detect_sunrise_and_night_market() {
        assert_eq!(allowed_slots_for_name("Fansipan Sunrise View").unwrap(), vec![TimeSlot::EarlyMorning]);
        assert_eq!(
            allowed_slots_for_name("Chợ Đêm Sơn Trà").unwrap(),
            vec![TimeSlot::Evening, TimeSlot::Night]
        );
        assert!(allowed_slots_for_name("Regular Park").is_none());
    }

    #[test]
    fn best_visit_time_prefers_category_over_name() {
        let slots = best_visit_time_for("beach", "Sunset Beach");
        assert_eq!(slots, vec![TimeSlot::Morning, TimeSlot::Afternoon]);
    }
}
