//! Search error types

use thiserror::Error;

use crate::loader::LoadError;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("either an ontology file or URL must be set")]
    NoSourceSpecified,

    #[error("could not load ontology: {0}")]
    LoadFailed(#[from] LoadError),

    #[error("invalid graph state: {0}")]
    InvalidGraphState(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SearchResult<T> = Result<T, SearchError>;

impl From<tokio::task::JoinError> for SearchError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            SearchError::InvalidGraphState(format!("search worker panicked: {}", err))
        } else {
            SearchError::InvalidGraphState(format!("search worker aborted: {}", err))
        }
    }
}
