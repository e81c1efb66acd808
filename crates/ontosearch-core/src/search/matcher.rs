//! Annotation matcher
//!
//! Scans the import closure of a root graph for entities whose annotations
//! contain the query, or whose IRI equals it. Matches found in several
//! graphs are all reported; [`dedupe`](super::dedup::dedupe) collapses them.

use std::sync::Arc;

use super::error::SearchResult;
use super::label::resolve_label;
use super::types::{MatchType, SearchCriteria, SearchHit, NO_CONTEXT};
use crate::graph::{AnnotationProperty, Entity, EntityKind, GraphHandle, Ontology};

/// Run every enabled (channel, kind) scan over the closure of `root`.
///
/// `query` must already be lower-cased. Output order is channel priority,
/// then kind priority, then closure order, then signature order.
pub fn scan(
    root: &GraphHandle,
    criteria: &SearchCriteria,
    query: &str,
) -> SearchResult<Vec<SearchHit>> {
    let closure = root.closure()?;
    let kinds = criteria.kinds();
    let mut hits = Vec::new();

    for channel in criteria.channels() {
        for &kind in &kinds {
            let before = hits.len();
            match channel.property() {
                Some(property) => {
                    scan_annotations(root, &closure, kind, &property, query, &mut hits)
                }
                None => scan_uris(root, &closure, kind, query, &mut hits),
            }
            log::debug!(
                "[Matcher] {:?}/{}: {} matches",
                channel,
                kind,
                hits.len() - before
            );
        }
    }

    Ok(hits)
}

/// Substring match of literal annotation values against `query`
pub fn scan_annotations(
    root: &GraphHandle,
    closure: &[GraphHandle],
    kind: EntityKind,
    property: &AnnotationProperty,
    query: &str,
    hits: &mut Vec<SearchHit>,
) {
    for graph in closure {
        for entity in graph.entities_of_kind(kind) {
            for annotation in graph.annotations_on(&entity.iri, property) {
                let Some((lexical, _)) = annotation.value.as_literal() else {
                    continue;
                };
                if lexical.to_lowercase().contains(query) {
                    hits.push(hit(
                        root,
                        graph,
                        entity,
                        MatchType::Annotation(property.clone()),
                        lexical.to_string(),
                    ));
                }
            }
        }
    }
}

/// Exact, case-insensitive match of entity IRIs against `query`
pub fn scan_uris(
    root: &GraphHandle,
    closure: &[GraphHandle],
    kind: EntityKind,
    query: &str,
    hits: &mut Vec<SearchHit>,
) {
    for graph in closure {
        for entity in graph.entities_of_kind(kind) {
            if entity.iri.to_lowercase() == query {
                hits.push(hit(root, graph, entity, MatchType::Uri, NO_CONTEXT.to_string()));
            }
        }
    }
}

fn hit(
    root: &GraphHandle,
    graph: &Ontology,
    entity: &Entity,
    match_type: MatchType,
    match_context: String,
) -> SearchHit {
    SearchHit {
        iri: entity.iri.clone(),
        name: resolve_label(entity, graph),
        kind: entity.kind,
        match_type,
        match_context,
        entity: entity.clone(),
        root: Arc::clone(root),
    }
}

