//! Ontology loading
//!
//! [`OntologyLoader`] is the seam to whatever parses ontology documents.
//! [`DocumentLoader`] is the bundled implementation: it reads JSON ontology
//! documents from disk or over HTTP and resolves their imports.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use serde::Deserialize;
use thiserror::Error;

use crate::graph::{
    AnnotationProperty, AnnotationValue, Entity, EntityKind, GraphHandle, Ontology,
    OntologyBuilder,
};
use crate::search::HttpConfig;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("cannot parse {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid document {location}: {reason}")]
    InvalidDocument { location: String, reason: String },

    #[error("failed to load import {location}: {source}")]
    Import {
        location: String,
        #[source]
        source: Box<LoadError>,
    },

    #[error("{0}")]
    Unsupported(String),
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Loads a root graph together with its import closure
#[async_trait]
pub trait OntologyLoader: Send + Sync {
    async fn load_from_url(&self, url: &str) -> LoadResult<GraphHandle>;

    async fn load_from_file(&self, path: &Path) -> LoadResult<GraphHandle>;
}

/// Resolved document location
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Location {
    File(PathBuf),
    Url(String),
}

impl Location {
    /// Resolve an import reference against the importing document.
    ///
    /// Only a document read from disk may import a `file://` reference.
    fn resolve(&self, reference: &str) -> LoadResult<Location> {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return Ok(Location::Url(reference.to_string()));
        }
        if let Some(path) = reference.strip_prefix("file://") {
            return match self {
                Location::File(_) => Ok(Location::File(PathBuf::from(path))),
                Location::Url(base) => Err(LoadError::InvalidDocument {
                    location: base.clone(),
                    reason: format!("remote document cannot import local file {}", reference),
                }),
            };
        }
        let resolved = match self {
            Location::File(base) => {
                let candidate = Path::new(reference);
                if candidate.is_absolute() {
                    Location::File(candidate.to_path_buf())
                } else {
                    let dir = base.parent().unwrap_or_else(|| Path::new(""));
                    Location::File(dir.join(candidate))
                }
            }
            Location::Url(base) => {
                let reference = reference.trim_start_matches("./");
                let prefix = match base.rfind('/') {
                    Some(idx) => &base[..=idx],
                    None => base.as_str(),
                };
                Location::Url(format!("{}{}", prefix, reference))
            }
        };
        Ok(resolved)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::File(path) => write!(f, "{}", path.display()),
            Location::Url(url) => f.write_str(url),
        }
    }
}

/// On-disk / on-wire document shape
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OntologyDocument {
    #[serde(default)]
    iri: Option<String>,
    #[serde(default)]
    imports: Vec<String>,
    #[serde(default)]
    classes: Vec<EntityDocument>,
    #[serde(default)]
    object_properties: Vec<EntityDocument>,
}

#[derive(Debug, Deserialize)]
struct EntityDocument {
    iri: String,
    #[serde(default)]
    annotations: Vec<AnnotationDocument>,
}

#[derive(Debug, Deserialize)]
struct AnnotationDocument {
    property: String,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    lang: Option<String>,
    #[serde(default)]
    resource: Option<String>,
}

fn property_from_name(name: &str) -> AnnotationProperty {
    match name {
        "label" => AnnotationProperty::Label,
        "comment" => AnnotationProperty::Comment,
        "definition" => AnnotationProperty::Definition,
        iri => AnnotationProperty::from_iri(iri),
    }
}

/// JSON ontology document loader
pub struct DocumentLoader {
    #[cfg(feature = "http")]
    client: reqwest::Client,
}

impl DocumentLoader {
    /// Create a loader using the given HTTP settings
    pub fn new(http: &HttpConfig) -> LoadResult<Self> {
        #[cfg(feature = "http")]
        {
            let client = reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(http.timeout_secs))
                .user_agent(http.user_agent.clone())
                .build()?;
            Ok(Self { client })
        }
        #[cfg(not(feature = "http"))]
        {
            let _ = http;
            Ok(Self {})
        }
    }

    async fn fetch(&self, location: &Location) -> LoadResult<Vec<u8>> {
        match location {
            Location::File(path) => tokio::fs::read(path).await.map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            }),
            Location::Url(url) => self.fetch_url(url).await,
        }
    }

    #[cfg(feature = "http")]
    async fn fetch_url(&self, url: &str) -> LoadResult<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    #[cfg(not(feature = "http"))]
    async fn fetch_url(&self, url: &str) -> LoadResult<Vec<u8>> {
        Err(LoadError::Unsupported(format!(
            "cannot load {}: built without the `http` feature",
            url
        )))
    }

    /// Canonical form of a location, so one file reached along different
    /// relative paths has one key
    async fn canonical(&self, location: Location) -> LoadResult<Location> {
        match location {
            Location::File(path) => match tokio::fs::canonicalize(&path).await {
                Ok(canonical) => Ok(Location::File(canonical)),
                Err(source) => Err(LoadError::Io { path, source }),
            },
            url => Ok(url),
        }
    }

    async fn import_target(&self, from: &Location, reference: &str) -> LoadResult<Location> {
        let target = from.resolve(reference)?;
        let requested = target.to_string();
        self.canonical(target)
            .await
            .map_err(|source| LoadError::Import {
                location: requested,
                source: Box::new(source),
            })
    }

    /// Load one document and, recursively, everything it imports.
    ///
    /// A document reached along several paths, or two documents naming the
    /// same ontology IRI, resolve to one shared graph. An import of a
    /// document still being loaded closes a cycle and yields `None`.
    fn load_graph<'a>(
        &'a self,
        location: Location,
        state: &'a mut LoadState,
    ) -> BoxFuture<'a, LoadResult<Option<GraphHandle>>> {
        async move {
            let bytes = self.fetch(&location).await?;
            let document: OntologyDocument =
                serde_json::from_slice(&bytes).map_err(|source| LoadError::Parse {
                    location: location.to_string(),
                    source,
                })?;

            if let Some(iri) = &document.iri {
                if state.ancestor_iris.contains(iri) {
                    log::debug!("[Loader] Skipping cyclic import of {} at {}", iri, location);
                    return Ok(None);
                }
                if let Some(graph) = state.by_iri.get(iri).cloned() {
                    log::debug!("[Loader] {} already loaded, reusing it for {}", iri, location);
                    state.by_location.insert(location, graph.clone());
                    return Ok(Some(graph));
                }
            }

            let mut builder = Ontology::builder();
            if let Some(iri) = document.iri.clone() {
                builder = builder.iri(iri.clone());
                state.ancestor_iris.push(iri);
            }

            state.ancestors.push(location.clone());
            for reference in &document.imports {
                let target = self.import_target(&location, reference).await?;
                if state.ancestors.contains(&target) {
                    log::debug!("[Loader] Skipping cyclic import {} from {}", target, location);
                    continue;
                }
                if let Some(graph) = state.by_location.get(&target) {
                    builder.push_import(graph.clone());
                    continue;
                }
                let loaded = self
                    .load_graph(target.clone(), &mut *state)
                    .await
                    .map_err(|source| LoadError::Import {
                        location: target.to_string(),
                        source: Box::new(source),
                    })?;
                if let Some(graph) = loaded {
                    builder.push_import(graph);
                }
            }
            state.ancestors.pop();
            if document.iri.is_some() {
                state.ancestor_iris.pop();
            }

            populate(&mut builder, EntityKind::Class, document.classes, &location)?;
            populate(
                &mut builder,
                EntityKind::ObjectProperty,
                document.object_properties,
                &location,
            )?;

            let graph = builder.build();
            if let Some(iri) = document.iri {
                state.by_iri.insert(iri, graph.clone());
            }
            state.by_location.insert(location, graph.clone());
            Ok(Some(graph))
        }
        .boxed()
    }

    async fn load_root(&self, location: Location) -> LoadResult<GraphHandle> {
        let start = std::time::Instant::now();
        log::info!("[Loader] Loading ontology from {}", location);
        let root = self.canonical(location.clone()).await?;
        let mut state = LoadState::default();
        let graph = self
            .load_graph(root, &mut state)
            .await?
            .ok_or_else(|| LoadError::InvalidDocument {
                location: location.to_string(),
                reason: "root document imports itself".to_string(),
            })?;
        log::info!(
            "[Loader] Loaded {} ({} documents) in {} ms",
            location,
            state.by_location.len(),
            start.elapsed().as_millis()
        );
        Ok(graph)
    }
}

/// Bookkeeping for one root load
#[derive(Default)]
struct LoadState {
    ancestors: Vec<Location>,
    ancestor_iris: Vec<String>,
    by_location: HashMap<Location, GraphHandle>,
    by_iri: HashMap<String, GraphHandle>,
}

fn populate(
    builder: &mut OntologyBuilder,
    kind: EntityKind,
    entities: Vec<EntityDocument>,
    location: &Location,
) -> LoadResult<()> {
    for entity in entities {
        if entity.iri.trim().is_empty() {
            return Err(LoadError::InvalidDocument {
                location: location.to_string(),
                reason: format!("{} with an empty IRI", kind),
            });
        }
        for annotation in entity.annotations {
            let value = match (annotation.value, annotation.resource) {
                (Some(lexical), _) => AnnotationValue::Literal {
                    lexical,
                    lang: annotation.lang,
                },
                (None, Some(iri)) => AnnotationValue::Iri(iri),
                (None, None) => {
                    return Err(LoadError::InvalidDocument {
                        location: location.to_string(),
                        reason: format!(
                            "annotation {} on {} has neither value nor resource",
                            annotation.property, entity.iri
                        ),
                    })
                }
            };
            builder.push_annotation(
                entity.iri.clone(),
                property_from_name(&annotation.property),
                value,
            );
        }
        builder.push_entity(Entity::new(kind, entity.iri));
    }
    Ok(())
}

#[async_trait]
impl OntologyLoader for DocumentLoader {
    async fn load_from_url(&self, url: &str) -> LoadResult<GraphHandle> {
        self.load_root(Location::Url(url.to_string())).await
    }

    async fn load_from_file(&self, path: &Path) -> LoadResult<GraphHandle> {
        self.load_root(Location::File(path.to_path_buf())).await
    }
}
