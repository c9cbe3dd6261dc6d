use serde::{Deserialize, Serialize};

/// Overall verdict returned by the Itinerary Verifier (spec §3 / §4.4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Warning,
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Warning,
    Error,
}

/// A single time-slot or pattern mismatch detected during verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationIssue {
    pub issue_type: String,
    pub spot_id: String,
    pub spot_name: String,
    pub current_slot: String,
    pub expected_slots: Vec<String>,
    pub day: u32,
    pub severity: IssueSeverity,
    pub reason: String,
    pub suggested_fix: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub verdict: Verdict,
    pub issues: Vec<VerificationIssue>,
    #[serde(default)]
    pub suggested_moves: Vec<String>,
    pub auto_fixed: bool,
    pub fixed_itinerary: Option<serde_json::Value>,
}

impl VerificationResult {
    pub fn from_issues(issues: Vec<VerificationIssue>) -> Self {
        let verdict = if issues.iter().any(|i| i.severity == IssueSeverity::Error) {
            Verdict::Fail
        } else if !issues.is_empty() {
            Verdict::Warning
        } else {
            Verdict::Pass
        };

        Self {
            verdict,
            issues,
            suggested_moves: Vec::new(),
            auto_fixed: false,
            fixed_itinerary: None,
        }
    }
}
