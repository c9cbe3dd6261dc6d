pub mod critic;
pub mod fix;
pub mod rules;

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use travel_core::collaborators::LlmClient;
use travel_protocol::verification::VerificationResult;

pub struct Verifier {
    llm: Option<Arc<dyn LlmClient>>,
}

impl Verifier {
    pub fn new(llm: Option<Arc<dyn LlmClient>>) -> Self {
        Self { llm }
    }

    pub async fn verify(&self, itinerary: &Value) -> VerificationResult {
        let rule_issues = rules::check(itinerary);

        let mut issues = rule_issues.clone();
        if let Some(llm) = &self.llm {
            if critic::should_run(itinerary, !rule_issues.is_empty()) {
                let already_reported: HashSet<(String, u32)> =
                    rule_issues.iter().map(|i| (i.spot_name.clone(), i.day)).collect();
                issues.extend(critic::check(llm.as_ref(), itinerary, &already_reported).await);
            }
        }

        let mut result = VerificationResult::from_issues(issues);
        if result.issues.iter().any(|i| i.severity == travel_protocol::verification::IssueSeverity::Error) {
            result.fixed_itinerary = Some(fix::apply(itinerary, &result.issues));
            result.auto_fixed = true;
        }
        result
    }
}
