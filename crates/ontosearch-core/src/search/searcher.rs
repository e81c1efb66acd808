//! Search orchestration
//!
//! [`Searcher`] owns a search session: the configured criteria and source,
//! the [`SourceCache`], the memo key of the last completed search, and the
//! published result set. Each search runs on its own tokio task; searches
//! against one session are serialised.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;

use super::config::SearchConfig;
use super::dedup::dedupe;
use super::error::{SearchError, SearchResult};
use super::matcher;
use super::source_cache::{LoadStats, SourceCache};
use super::types::{SearchCriteria, SearchHit, SearchOutcome, SourceIdentity};
use crate::loader::{DocumentLoader, OntologyLoader};

/// Everything that decides whether a repeated search can be skipped
#[derive(Debug, Clone, PartialEq, Eq)]
struct SearchKey {
    query: String,
    criteria: SearchCriteria,
    source: SourceIdentity,
}

#[derive(Debug, Clone, Default)]
struct Settings {
    criteria: SearchCriteria,
    source: SourceIdentity,
}

struct Session {
    cache: SourceCache,
    last: Option<SearchKey>,
}

struct Inner {
    settings: Mutex<Settings>,
    session: AsyncMutex<Session>,
    results: RwLock<Arc<Vec<SearchHit>>>,
}

/// Memoized, single-flight ontology searcher
#[derive(Clone)]
pub struct Searcher {
    inner: Arc<Inner>,
}

impl Searcher {
    /// Create a searcher with default criteria and no source
    pub fn new(loader: Arc<dyn OntologyLoader>) -> Self {
        Self {
            inner: Arc::new(Inner {
                settings: Mutex::new(Settings::default()),
                session: AsyncMutex::new(Session {
                    cache: SourceCache::new(loader),
                    last: None,
                }),
                results: RwLock::new(Arc::new(Vec::new())),
            }),
        }
    }

    /// Create a searcher backed by [`DocumentLoader`], seeded from `config`
    pub fn from_config(config: &SearchConfig) -> SearchResult<Self> {
        let loader = DocumentLoader::new(&config.http)?;
        let searcher = Self::new(Arc::new(loader));
        {
            let mut settings = searcher.inner.settings.lock();
            settings.criteria = config.criteria;
            settings.source = config.source.identity();
        }
        Ok(searcher)
    }

    /// Replace the criteria used by subsequent searches
    pub fn configure(&self, criteria: SearchCriteria) {
        self.inner.settings.lock().criteria = criteria;
    }

    /// Replace the source used by subsequent searches
    pub fn set_source(&self, url: Option<String>, file: Option<PathBuf>) {
        self.inner.settings.lock().source = SourceIdentity { url, file };
    }

    pub fn criteria(&self) -> SearchCriteria {
        self.inner.settings.lock().criteria
    }

    pub fn source(&self) -> SourceIdentity {
        self.inner.settings.lock().source.clone()
    }

    /// Snapshot of the published result set
    pub fn current_results(&self) -> Arc<Vec<SearchHit>> {
        self.inner.results.read().clone()
    }

    /// Statistics of the cached source, waiting for any in-flight search
    pub async fn load_stats(&self) -> Option<LoadStats> {
        self.inner.session.lock().await.cache.stats().cloned()
    }

    /// Search and wait for the outcome
    pub async fn search(&self, query: &str) -> SearchOutcome {
        self.spawn_search(query).outcome().await
    }

    /// Start a search on a background task.
    ///
    /// Must be called from within a tokio runtime. Dropping the returned
    /// task does not cancel the search.
    pub fn spawn_search(&self, query: impl Into<String>) -> SearchTask {
        let inner = self.inner.clone();
        let query = query.into();
        let handle = tokio::spawn(async move { inner.run(query).await });
        SearchTask {
            inner: self.inner.clone(),
            handle,
        }
    }
}

impl Inner {
    async fn run(&self, query: String) -> SearchOutcome {
        let key = {
            let settings = self.settings.lock();
            SearchKey {
                query: query.to_lowercase(),
                criteria: settings.criteria,
                source: settings.source.clone(),
            }
        };

        let mut session = self.session.lock().await;

        if session.last.as_ref() == Some(&key) {
            log::debug!("[Searcher] Unchanged search for \"{}\", reusing results", query);
            return SearchOutcome::completed(self.results.read().clone(), true);
        }

        let graph = match session.cache.ensure_loaded(&key.source).await {
            Ok((graph, reloaded)) => {
                if reloaded {
                    log::info!("[Searcher] Source {} loaded", key.source);
                }
                graph
            }
            Err(e) => {
                log::warn!("[Searcher] Search for \"{}\" failed: {}", query, e);
                return SearchOutcome::failed(e, self.results.read().clone());
            }
        };

        let criteria = key.criteria;
        let lowered = key.query.clone();
        let scanned = tokio::task::spawn_blocking(move || {
            matcher::scan(&graph, &criteria, &lowered).map(|hits| {
                let raw = hits.len();
                (raw, dedupe(hits))
            })
        })
        .await;

        let (raw, hits) = match scanned {
            Ok(Ok(done)) => done,
            Ok(Err(e)) => {
                log::warn!("[Searcher] Search for \"{}\" failed: {}", query, e);
                return SearchOutcome::failed(e, self.results.read().clone());
            }
            Err(join_err) => {
                let e: SearchError = join_err.into();
                log::warn!("[Searcher] Search for \"{}\" failed: {}", query, e);
                return SearchOutcome::failed(e, self.results.read().clone());
            }
        };

        let published = Arc::new(hits);
        *self.results.write() = published.clone();
        session.last = Some(key);

        log::info!(
            "[Searcher] \"{}\": {} results ({} before dedup)",
            query,
            published.len(),
            raw
        );
        SearchOutcome::completed(published, false)
    }
}

/// Handle to a search running in the background
pub struct SearchTask {
    inner: Arc<Inner>,
    handle: JoinHandle<SearchOutcome>,
}

impl SearchTask {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the search to finish
    pub async fn outcome(self) -> SearchOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(join_err) => {
                let e: SearchError = join_err.into();
                log::warn!("[Searcher] Search task failed: {}", e);
                SearchOutcome::failed(e, self.inner.results.read().clone())
            }
        }
    }
}
