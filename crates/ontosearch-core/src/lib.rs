//! ontosearch-core
//!
//! Search core for ontology term lookup: finds classes and object
//! properties whose labels, comments or definitions contain a query, or
//! whose IRI equals it, across an ontology and everything it imports.
//!
//! Parsing ontology documents is delegated to an [`loader::OntologyLoader`];
//! [`loader::DocumentLoader`] is the bundled JSON implementation.

#[cfg(test)]
mod tests;

pub mod graph;
pub mod loader;
pub mod search;

pub use graph::{Entity, EntityKind, GraphHandle, Ontology};
pub use search::{SearchCriteria, SearchError, SearchHit, SearchOutcome, SearchStatus, Searcher};
