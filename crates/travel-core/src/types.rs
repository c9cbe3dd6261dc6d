use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a conversation session (UUIDv7 — time-sortable for log correlation).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A unique identifier for a sub-task within an execution plan, e.g. `"spots_1"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(prefix: &str, n: usize) -> Self {
        Self(format!("{prefix}_{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Canonical destination identifier after alias resolution and slugification
/// (see `geo::normalize_location`), e.g. `"lao-cai"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProvinceId(pub String);

impl ProvinceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProvinceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProvinceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Coarse budget tier used throughout the hotel, cost, and aggregator layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BudgetLevel {
    Thrifty,
    #[default]
    Mid,
    Luxury,
}

impl fmt::Display for BudgetLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetLevel::Thrifty => write!(f, "thrifty"),
            BudgetLevel::Mid => write!(f, "mid"),
            BudgetLevel::Luxury => write!(f, "luxury"),
        }
    }
}

impl std::str::FromStr for BudgetLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "thrifty" | "tiet-kiem" | "tiết kiệm" => Ok(BudgetLevel::Thrifty),
            "mid" | "trung-binh" | "trung bình" | "binh-dan" | "bình dân" => Ok(BudgetLevel::Mid),
            "luxury" | "sang-trong" | "sang trọng" | "cao-cap" | "cao cấp" => {
                Ok(BudgetLevel::Luxury)
            }
            other => Err(format!("unknown budget level: {other}")),
        }
    }
}

/// Who the traveler is going with; drives interest weighting and default people_count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanionType {
    Solo,
    Couple,
    Family,
    Friends,
    Business,
}

impl fmt::Display for CompanionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompanionType::Solo => "solo",
            CompanionType::Couple => "couple",
            CompanionType::Family => "family",
            CompanionType::Friends => "friends",
            CompanionType::Business => "business",
        };
        write!(f, "{s}")
    }
}

/// A numeric range in VND. `None` on either side means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PriceRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl PriceRange {
    pub fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Self { min, max }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, price: i64) -> bool {
        self.min.map(|m| price >= m).unwrap_or(true) && self.max.map(|m| price <= m).unwrap_or(true)
    }
}

/// A geographic point, used by the hotel geo-fallback and distance queries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}
