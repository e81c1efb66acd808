//! In-memory entity graph
//!
//! An [`Ontology`] holds the entities declared in one document, the
//! annotation assertions made in that document, and handles to the
//! documents it imports. Graphs are immutable once built and shared as
//! [`GraphHandle`]s.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::search::{SearchError, SearchResult};

pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
/// IAO "definition"
pub const IAO_DEFINITION: &str = "http://purl.obolibrary.org/obo/IAO_0000115";

/// Shared, immutable handle to a loaded graph
pub type GraphHandle = Arc<Ontology>;

/// Kind of an addressable graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Class,
    ObjectProperty,
}

impl EntityKind {
    /// Scan priority order: classes before object properties
    pub const ALL: [EntityKind; 2] = [EntityKind::Class, EntityKind::ObjectProperty];
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Class => write!(f, "Class"),
            EntityKind::ObjectProperty => write!(f, "Object Property"),
        }
    }
}

/// A typed graph node. Two entities are the same node when kind and IRI match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub iri: String,
}

impl Entity {
    pub fn new(kind: EntityKind, iri: impl Into<String>) -> Self {
        Self {
            kind,
            iri: iri.into(),
        }
    }

    pub fn class(iri: impl Into<String>) -> Self {
        Self::new(EntityKind::Class, iri)
    }

    pub fn object_property(iri: impl Into<String>) -> Self {
        Self::new(EntityKind::ObjectProperty, iri)
    }

    /// Fragment after the last `#`, or the whole IRI when there is none
    pub fn local_name(&self) -> &str {
        match self.iri.rfind('#') {
            Some(idx) => &self.iri[idx + 1..],
            None => &self.iri,
        }
    }
}

/// Annotation property of an assertion
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationProperty {
    Label,
    Comment,
    Definition,
    Other(String),
}

impl AnnotationProperty {
    /// Resolve a property IRI to its kind
    pub fn from_iri(iri: &str) -> Self {
        match iri {
            RDFS_LABEL => Self::Label,
            RDFS_COMMENT => Self::Comment,
            IAO_DEFINITION => Self::Definition,
            other => Self::Other(other.to_string()),
        }
    }

    /// The well-known vocabulary IRI of this property
    pub fn iri(&self) -> &str {
        match self {
            Self::Label => RDFS_LABEL,
            Self::Comment => RDFS_COMMENT,
            Self::Definition => IAO_DEFINITION,
            Self::Other(iri) => iri,
        }
    }
}

impl fmt::Display for AnnotationProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.iri())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationValue {
    Literal { lexical: String, lang: Option<String> },
    Iri(String),
}

impl AnnotationValue {
    pub fn literal(lexical: impl Into<String>) -> Self {
        Self::Literal {
            lexical: lexical.into(),
            lang: None,
        }
    }

    pub fn tagged(lexical: impl Into<String>, lang: impl Into<String>) -> Self {
        Self::Literal {
            lexical: lexical.into(),
            lang: Some(lang.into()),
        }
    }

    pub fn as_literal(&self) -> Option<(&str, Option<&str>)> {
        match self {
            Self::Literal { lexical, lang } => Some((lexical, lang.as_deref())),
            Self::Iri(_) => None,
        }
    }
}

/// One annotation assertion on a subject IRI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub property: AnnotationProperty,
    pub value: AnnotationValue,
}

/// A single graph: declarations and annotation assertions of one document
#[derive(Debug, Default)]
pub struct Ontology {
    iri: Option<String>,
    classes: Vec<Entity>,
    object_properties: Vec<Entity>,
    annotations: HashMap<String, Vec<Annotation>>,
    imports: Vec<GraphHandle>,
}

impl Ontology {
    pub fn builder() -> OntologyBuilder {
        OntologyBuilder::default()
    }

    /// Ontology IRI, if the document names itself
    pub fn iri(&self) -> Option<&str> {
        self.iri.as_deref()
    }

    /// Directly imported graphs, in declaration order
    pub fn imports(&self) -> &[GraphHandle] {
        &self.imports
    }

    /// Entities of `kind` declared in this graph's signature
    pub fn entities_of_kind(&self, kind: EntityKind) -> &[Entity] {
        match kind {
            EntityKind::Class => &self.classes,
            EntityKind::ObjectProperty => &self.object_properties,
        }
    }

    /// Annotations asserted in this graph on `iri` using `property`
    pub fn annotations_on<'a>(
        &'a self,
        iri: &str,
        property: &'a AnnotationProperty,
    ) -> impl Iterator<Item = &'a Annotation> + 'a {
        self.annotations
            .get(iri)
            .into_iter()
            .flatten()
            .filter(move |a| &a.property == property)
    }

    /// Number of entities declared in this graph
    pub fn entity_count(&self) -> usize {
        self.classes.len() + self.object_properties.len()
    }

    /// The root graph followed by every graph it transitively imports.
    ///
    /// Depth-first in import declaration order, each graph once. Two
    /// different graphs claiming the same ontology IRI cannot be resolved
    /// into a single closure.
    pub fn closure(self: &Arc<Self>) -> SearchResult<Vec<GraphHandle>> {
        let mut ordered: Vec<GraphHandle> = Vec::new();
        let mut seen: HashSet<*const Ontology> = HashSet::new();
        let mut stack: Vec<GraphHandle> = vec![Arc::clone(self)];

        while let Some(graph) = stack.pop() {
            let ptr = Arc::as_ptr(&graph);
            if !seen.insert(ptr) {
                continue;
            }
            // Push in reverse so the first import is visited first
            for import in graph.imports.iter().rev() {
                stack.push(Arc::clone(import));
            }
            ordered.push(graph);
        }

        let mut by_iri: HashMap<&str, *const Ontology> = HashMap::new();
        for graph in &ordered {
            if let Some(iri) = graph.iri() {
                let ptr = Arc::as_ptr(graph);
                if let Some(existing) = by_iri.insert(iri, ptr) {
                    if existing != ptr {
                        return Err(SearchError::InvalidGraphState(format!(
                            "two different graphs in the import closure claim ontology IRI {}",
                            iri
                        )));
                    }
                }
            }
        }

        Ok(ordered)
    }
}

/// Incremental constructor for [`Ontology`]
#[derive(Debug, Default)]
pub struct OntologyBuilder {
    ontology: Ontology,
    declared: HashSet<Entity>,
}

impl OntologyBuilder {
    pub fn iri(mut self, iri: impl Into<String>) -> Self {
        self.ontology.iri = Some(iri.into());
        self
    }

    /// Declare an entity. Re-declaring is a no-op.
    pub fn declare(mut self, entity: Entity) -> Self {
        self.push_entity(entity);
        self
    }

    pub fn class(self, iri: impl Into<String>) -> Self {
        self.declare(Entity::class(iri))
    }

    pub fn object_property(self, iri: impl Into<String>) -> Self {
        self.declare(Entity::object_property(iri))
    }

    pub fn annotate(
        mut self,
        subject: impl Into<String>,
        property: AnnotationProperty,
        value: AnnotationValue,
    ) -> Self {
        self.push_annotation(subject, property, value);
        self
    }

    pub fn label(self, subject: impl Into<String>, value: AnnotationValue) -> Self {
        self.annotate(subject, AnnotationProperty::Label, value)
    }

    pub fn comment(self, subject: impl Into<String>, text: impl Into<String>) -> Self {
        self.annotate(subject, AnnotationProperty::Comment, AnnotationValue::literal(text))
    }

    pub fn definition(self, subject: impl Into<String>, text: impl Into<String>) -> Self {
        self.annotate(
            subject,
            AnnotationProperty::Definition,
            AnnotationValue::literal(text),
        )
    }

    pub fn import(mut self, graph: GraphHandle) -> Self {
        self.push_import(graph);
        self
    }

    pub fn push_entity(&mut self, entity: Entity) {
        if !self.declared.insert(entity.clone()) {
            return;
        }
        match entity.kind {
            EntityKind::Class => self.ontology.classes.push(entity),
            EntityKind::ObjectProperty => self.ontology.object_properties.push(entity),
        }
    }

    pub fn push_annotation(
        &mut self,
        subject: impl Into<String>,
        property: AnnotationProperty,
        value: AnnotationValue,
    ) {
        self.ontology
            .annotations
            .entry(subject.into())
            .or_default()
            .push(Annotation { property, value });
    }

    pub fn push_import(&mut self, graph: GraphHandle) {
        self.ontology.imports.push(graph);
    }

    pub fn build(self) -> GraphHandle {
        Arc::new(self.ontology)
    }
}
