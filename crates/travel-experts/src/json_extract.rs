//! Tolerant JSON extraction from LLM text output (spec §4.4.4): fenced code
//! block, first/last brace slice, then a shallow balanced-brace scan.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").unwrap());

pub fn extract_json(text: &str) -> Option<Value> {
    if let Some(caps) = FENCE_RE.captures(text) {
        if let Ok(v) = serde_json::from_str(&caps[1]) {
            return Some(v);
        }
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if end > start {
            if let Ok(v) = serde_json::from_str(&text[start..=end]) {
                return Some(v);
            }
        }
    }

    balanced_brace_scan(text)
}

fn balanced_brace_scan(text: &str) -> Option<Value> {
    let bytes = text.as_bytes();
    let start = text.find('{')?;
    let mut depth = 0i32;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    if let Ok(v) = serde_json::from_str(&text[start..=i]) {
                        return Some(v);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_fenced_block() {
        let text = "here is your plan:\n```json\n{\"days\": []}\n```\nenjoy!";
        assert_eq!(extract_json(text).unwrap(), serde_json::json!({"days": []}));
    }

    #[test]
    fn extracts_from_brace_slice_without_fence() {
        let text = "Sure, here you go {\"a\": 1} thanks";
        assert_eq!(extract_json(text).unwrap(), serde_json::json!({"a": 1}));
    }

    #[test]
    fn balanced_scan_handles_nested_braces_with_trailing_text() {
        let text = "{\"a\": {\"b\": 1}} some trailing junk } more";
        assert_eq!(extract_json(text).unwrap(), serde_json::json!({"a": {"b": 1}}));
    }

    #[test]
    fn returns_none_for_no_json() {
        assert!(extract_json("no json here").is_none());
    }
}
