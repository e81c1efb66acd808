//! Display-name resolution

use crate::graph::{AnnotationProperty, Entity, Ontology};

/// Pick a human-readable name for `entity` from the labels asserted in `graph`.
///
/// Every label literal tagged `en` or carrying no language tag qualifies and
/// the last qualifying one in assertion order wins. Without any qualifying
/// label the name falls back to [`Entity::local_name`].
pub fn resolve_label(entity: &Entity, graph: &Ontology) -> String {
    let property = AnnotationProperty::Label;
    let mut label: Option<&str> = None;

    for annotation in graph.annotations_on(&entity.iri, &property) {
        if let Some((lexical, lang)) = annotation.value.as_literal() {
            let qualifies = match lang {
                None => true,
                Some(tag) => tag.is_empty() || tag.eq_ignore_ascii_case("en"),
            };
            if qualifies {
                label = Some(lexical);
            }
        }
    }

    match label {
        Some(text) => text.to_string(),
        None => entity.local_name().to_string(),
    }
}
