//! Result deduplication

use std::collections::HashSet;

use super::types::SearchHit;

/// Keep the earliest hit for each IRI, compared case-insensitively.
pub fn dedupe(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut seen: HashSet<String> = HashSet::with_capacity(hits.len());
    hits.into_iter()
        .filter(|hit| seen.insert(hit.iri.to_lowercase()))
        .collect()
}
