//! Ontology search
//!
//! Label, comment, definition and URI search over an ontology and its
//! import closure.
//!
//! ## Pipeline
//!
//! - [`SourceCache`] loads the active ontology, or reuses it when the source
//!   is unchanged
//! - [`matcher::scan`] runs every enabled channel over the graph closure
//! - [`dedupe`] keeps the first hit per IRI
//! - [`Searcher`] memoizes repeated searches and publishes the result set
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ontosearch_core::search::{SearchConfig, SearchCriteria, Searcher};
//!
//! let searcher = Searcher::from_config(&SearchConfig::load()?)?;
//! searcher.set_source(None, Some("go.json".into()));
//! searcher.configure(SearchCriteria { match_definition: true, ..Default::default() });
//! let outcome = searcher.search("apoptosis").await;
//! for hit in outcome.results.iter() {
//!     println!("{} {} ({})", hit.name, hit.iri, hit.match_type);
//! }
//! ```

mod config;
mod dedup;
mod error;
mod label;
pub mod matcher;
mod searcher;
mod source_cache;
mod types;


pub use config::{HttpConfig, SearchConfig, SourceConfig};
pub use dedup::dedupe;
pub use error::{SearchError, SearchResult};
pub use label::resolve_label;
pub use searcher::{SearchTask, Searcher};
pub use source_cache::{LoadStats, SourceCache};
pub use types::*;
