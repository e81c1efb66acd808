//! Common types for search module

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

use super::error::SearchError;
use crate::graph::{AnnotationProperty, Entity, EntityKind, GraphHandle};

/// Match context recorded for URI matches, which have no literal text
pub const NO_CONTEXT: &str = "NA";

/// Match type string recorded for URI matches
pub const URI_MATCH: &str = "URI";

/// Which channels and entity kinds a search covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default = "default_true")]
    pub match_label: bool,
    #[serde(default)]
    pub match_comment: bool,
    #[serde(default)]
    pub match_definition: bool,
    #[serde(default = "default_true")]
    pub match_uri: bool,
    #[serde(default = "default_true")]
    pub include_classes: bool,
    #[serde(default)]
    pub include_object_properties: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            match_label: true,
            match_comment: false,
            match_definition: false,
            match_uri: true,
            include_classes: true,
            include_object_properties: false,
        }
    }
}

impl SearchCriteria {
    /// Criteria with every flag off
    pub fn none() -> Self {
        Self {
            match_label: false,
            match_comment: false,
            match_definition: false,
            match_uri: false,
            include_classes: false,
            include_object_properties: false,
        }
    }

    /// Enabled channels, highest priority first
    pub fn channels(&self) -> Vec<Channel> {
        Channel::PRIORITY
            .into_iter()
            .filter(|channel| match channel {
                Channel::Label => self.match_label,
                Channel::Definition => self.match_definition,
                Channel::Comment => self.match_comment,
                Channel::Uri => self.match_uri,
            })
            .collect()
    }

    /// Enabled entity kinds, highest priority first
    pub fn kinds(&self) -> Vec<EntityKind> {
        EntityKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                EntityKind::Class => self.include_classes,
                EntityKind::ObjectProperty => self.include_object_properties,
            })
            .collect()
    }
}

/// One independently toggleable matching dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Label,
    Definition,
    Comment,
    Uri,
}

impl Channel {
    /// Scan order; earlier channels win deduplication ties
    pub const PRIORITY: [Channel; 4] = [
        Channel::Label,
        Channel::Definition,
        Channel::Comment,
        Channel::Uri,
    ];

    /// Annotation property scanned by a textual channel
    pub fn property(&self) -> Option<AnnotationProperty> {
        match self {
            Channel::Label => Some(AnnotationProperty::Label),
            Channel::Definition => Some(AnnotationProperty::Definition),
            Channel::Comment => Some(AnnotationProperty::Comment),
            Channel::Uri => None,
        }
    }
}

/// Where the active ontology comes from. A file wins over a URL at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceIdentity {
    pub url: Option<String>,
    pub file: Option<PathBuf>,
}

impl SourceIdentity {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            file: None,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            url: None,
            file: Some(path.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.url.is_none() && self.file.is_none()
    }
}

impl fmt::Display for SourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, &self.url) {
            (Some(file), _) => write!(f, "{}", file.display()),
            (None, Some(url)) => f.write_str(url),
            (None, None) => f.write_str("<no source>"),
        }
    }
}

/// How a hit was matched
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchType {
    Annotation(AnnotationProperty),
    Uri,
}

impl MatchType {
    /// Property IRI for annotation matches, `"URI"` otherwise
    pub fn as_str(&self) -> &str {
        match self {
            MatchType::Annotation(property) => property.iri(),
            MatchType::Uri => URI_MATCH,
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MatchType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single search result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    /// IRI of the matched entity
    pub iri: String,
    /// Display name from the label resolver
    pub name: String,
    pub kind: EntityKind,
    pub match_type: MatchType,
    /// Literal text that matched, or [`NO_CONTEXT`]
    pub match_context: String,
    pub entity: Entity,
    /// Root graph the hit was found under
    #[serde(skip)]
    pub root: GraphHandle,
}

/// Final status of one search invocation
#[derive(Debug)]
pub enum SearchStatus {
    Ok,
    NoResults,
    Error(SearchError),
}

impl SearchStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, SearchStatus::Error(_))
    }
}

/// Outcome of [`Searcher::search`](super::Searcher::search)
#[derive(Debug)]
pub struct SearchOutcome {
    pub status: SearchStatus,
    /// Published result set. On error this is the previously published set.
    pub results: Arc<Vec<SearchHit>>,
    /// True when the memoized result set was returned without searching
    pub cached: bool,
}

impl SearchOutcome {
    pub(crate) fn completed(results: Arc<Vec<SearchHit>>, cached: bool) -> Self {
        let status = if results.is_empty() {
            SearchStatus::NoResults
        } else {
            SearchStatus::Ok
        };
        Self {
            status,
            results,
            cached,
        }
    }

    pub(crate) fn failed(error: SearchError, results: Arc<Vec<SearchHit>>) -> Self {
        Self {
            status: SearchStatus::Error(error),
            results,
            cached: false,
        }
    }
}
