//! Ordinal-word table and a simple name-similarity ratio (spec §4.8 Design
//! Note). Grounded in the shared category/table convention used by the
//! builder and verifier — a small static lookup plus a straightforward
//! string-distance fallback rather than a full NLP dependency.

use once_cell::sync::Lazy;
use std::collections::HashMap;

static ORDINALS: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    HashMap::from([
        ("the first", 0),
        ("cái đầu tiên", 0),
        ("cái thứ nhất", 0),
        ("first", 0),
        ("thứ nhất", 0),
        ("the second", 1),
        ("cái thứ hai", 1),
        ("second", 1),
        ("thứ hai", 1),
        ("the third", 2),
        ("cái thứ ba", 2),
        ("third", 2),
        ("thứ ba", 2),
        ("the fourth", 3),
        ("thứ tư", 3),
        ("the fifth", 4),
        ("thứ năm", 4),
    ])
});

/// Map an ordinal phrase in `text` to a zero-based index, if present.
pub fn ordinal_index(text: &str) -> Option<usize> {
    let lower = text.to_lowercase();
    ORDINALS
        .iter()
        .filter(|(phrase, _)| lower.contains(*phrase))
        .max_by_key(|(phrase, _)| phrase.len())
        .map(|(_, idx)| *idx)
}

/// Normalized Levenshtein-style similarity ratio in [0, 1]; 1.0 means
/// identical strings.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let dist = levenshtein(&a, &b);
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        1.0
    } else {
        1.0 - (dist as f64 / max_len as f64)
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut dp = vec![0usize; b.len() + 1];
    for (j, v) in dp.iter_mut().enumerate() {
        *v = j;
    }
    for i in 1..=a.len() {
        let mut prev = dp[0];
        dp[0] = i;
        for j in 1..=b.len() {
            let tmp = dp[j];
            dp[j] = if a[i - 1] == b[j - 1] {
                prev
            } else {
                1 + prev.min(dp[j]).min(dp[j - 1])
            };
            prev = tmp;
        }
    }
    dp[b.len()]
}
