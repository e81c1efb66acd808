//! Search configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::error::{SearchError, SearchResult};
use super::types::{SearchCriteria, SourceIdentity};

/// Main search configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Channels and entity kinds searched by default
    #[serde(default)]
    pub criteria: SearchCriteria,

    /// Ontology source used until the caller sets another one
    #[serde(default)]
    pub source: SourceConfig,

    /// Remote loading configuration
    #[serde(default)]
    pub http: HttpConfig,
}

/// Ontology source configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub url: Option<String>,

    /// Takes precedence over `url` when both are set
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl SourceConfig {
    pub fn identity(&self) -> SourceIdentity {
        SourceIdentity {
            url: self.url.clone(),
            file: self.file.clone(),
        }
    }
}

/// HTTP client configuration for URL sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("ontosearch/{}", env!("CARGO_PKG_VERSION"))
}

impl SearchConfig {
    /// Load configuration from file and environment
    /// Priority: environment variables > config.toml > defaults
    pub fn load() -> SearchResult<Self> {
        let path = Self::config_path();
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    /// Parse a `config.toml` document
    pub fn from_toml(content: &str) -> SearchResult<Self> {
        toml::from_str(content).map_err(|e| SearchError::Config(e.to_string()))
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("ONTOSEARCH_SOURCE_URL") {
            if !url.is_empty() {
                self.source.url = Some(url);
            }
        }
        if let Ok(file) = std::env::var("ONTOSEARCH_SOURCE_FILE") {
            if !file.is_empty() {
                self.source.file = Some(PathBuf::from(file));
            }
        }
        if let Ok(secs) = std::env::var("ONTOSEARCH_HTTP_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(secs) => self.http.timeout_secs = secs,
                Err(_) => log::warn!("[Config] Ignoring invalid ONTOSEARCH_HTTP_TIMEOUT_SECS={}", secs),
            }
        }
    }

    /// Get base config directory
    fn config_dir() -> PathBuf {
        if let Ok(root) = std::env::var("ONTOSEARCH_ROOT") {
            return PathBuf::from(root);
        }

        dirs::home_dir()
            .map(|h| h.join(".ontosearch"))
            .unwrap_or_else(|| PathBuf::from(".ontosearch"))
    }

    /// Get config file path (config.toml)
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}
