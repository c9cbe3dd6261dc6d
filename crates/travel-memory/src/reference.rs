//! Reference resolution (spec §4.8 Design Note): resolves phrases like "the
//! first one" or "the hotel you showed me" against the bounded recent-result
//! caches on Context.
//!
//! Cascade: ordinal word → substring match → fuzzy name similarity (≥0.6) →
//! optional semantic search (cosine ≥0.6, skipped cleanly when no hybrid
//! search handle is configured — never an error).

use std::sync::Arc;

use travel_core::collaborators::HybridSearch;
use travel_core::context::RecentRecord;
use travel_core::types::ProvinceId;

use crate::error::{MemoryError, Result};
use crate::ordinal;

const FUZZY_THRESHOLD: f64 = 0.6;

pub struct ReferenceResolver {
    hybrid_search: Option<Arc<dyn HybridSearch>>,
}

impl ReferenceResolver {
    pub fn new(hybrid_search: Option<Arc<dyn HybridSearch>>) -> Self {
        Self { hybrid_search }
    }

    /// Resolve `phrase` against `candidates`, trying ordinal, substring, and
    /// fuzzy match in order. Does not fall through to semantic search — use
    /// `resolve_with_semantic` when a province context is available.
    pub fn resolve<'a>(&self, phrase: &str, candidates: &'a [RecentRecord]) -> Result<&'a RecentRecord> {
        if candidates.is_empty() {
            return Err(MemoryError::Unresolved(phrase.to_string()));
        }

        if let Some(idx) = ordinal::ordinal_index(phrase) {
            if let Some(r) = candidates.get(idx) {
                return Ok(r);
            }
        }

        let lower = phrase.to_lowercase();
        if let Some(r) = candidates.iter().find(|c| lower.contains(&c.name.to_lowercase())) {
            return Ok(r);
        }

        let best = candidates
            .iter()
            .map(|c| (c, ordinal::similarity(phrase, &c.name)))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
        if let Some((record, score)) = best {
            if score >= FUZZY_THRESHOLD {
                return Ok(record);
            }
        }

        Err(MemoryError::Unresolved(phrase.to_string()))
    }

    /// Same cascade, with a semantic-search fallback attempted last when a
    /// hybrid search collaborator is configured. Skipped cleanly (not an
    /// error) when it is not.
    pub async fn resolve_with_semantic<'a>(
        &self,
        phrase: &str,
        candidates: &'a [RecentRecord],
        province: &ProvinceId,
    ) -> Option<RecentRecord> {
        if let Ok(r) = self.resolve(phrase, candidates) {
            return Some(r.clone());
        }

        let search = self.hybrid_search.as_ref()?;
        let results = search.search_spots(phrase, province, 1, FUZZY_THRESHOLD).await.ok()?;
        let top = results.into_iter().next()?;
        serde_json::from_value(top).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> RecentRecord {
        RecentRecord {
            id: id.to_string(),
            name: name.to_string(),
            category: None,
            rating: None,
            price: None,
            lat: None,
            lng: None,
            image: None,
            best_visit_time: Vec::new(),
            avg_duration_min: None,
        }
    }

    #[test]
    fn resolves_by_ordinal() {
        let resolver = ReferenceResolver::new(None);
        let candidates = vec![record("1", "Hang Mua"), record("2", "Trang An")];
        let r = resolver.resolve("cho mình cái đầu tiên", &candidates).unwrap();
        assert_eq!(r.id, "1");
    }

    #[test]
    fn resolves_by_substring() {
        let resolver = ReferenceResolver::new(None);
        let candidates = vec![record("1", "Hang Mua"), record("2", "Trang An")];
        let r = resolver.resolve("mình thích Trang An hơn", &candidates).unwrap();
        assert_eq!(r.id, "2");
    }

    #[test]
    fn resolves_by_fuzzy_match() {
        let resolver = ReferenceResolver::new(None);
        let candidates = vec![record("1", "Mường Thanh Luxury")];
        let r = resolver.resolve("khách sạn Mương Thanh Luxury nhé", &candidates);
        assert!(r.is_ok());
    }

    #[test]
    fn unresolved_when_no_match() {
        let resolver = ReferenceResolver::new(None);
        let candidates = vec![record("1", "Hang Mua")];
        assert!(resolver.resolve("quán phở nổi tiếng", &candidates).is_err());
    }

    #[test]
    fn empty_candidates_is_unresolved() {
        let resolver = ReferenceResolver::new(None);
        assert!(resolver.resolve("cái đầu tiên", &[]).is_err());
    }
}
