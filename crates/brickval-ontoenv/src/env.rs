//! オントロジー環境
//!
//! Indexes the ontologies found in local directories by the IRIs they
//! declare and resolves `owl:imports` closures against that index, falling
//! back to the network.

use crate::fetch::{Fetcher, HttpFetcher};
use crate::source::{file_iri, OntologySource};
use crate::OntoEnvError;
use brickval_core::vocab::{owl, rdf};
use brickval_core::{parse, parse_into, Graph, RdfFormat, Term};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Ontology environment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Directories scanned recursively for ontology files
    pub search_dirs: Vec<PathBuf>,
    /// Never fetch over the network
    pub offline: bool,
    /// Fail on imports that cannot be resolved
    pub strict: bool,
    pub fetch_timeout: Duration,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            search_dirs: Vec::new(),
            offline: false,
            strict: true,
            fetch_timeout: Duration::from_secs(60),
        }
    }
}

/// Outcome of resolving an import closure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Imported ontology IRIs, in resolution order
    pub resolved: Vec<String>,
    pub unresolved: Vec<String>,
}

pub struct OntoEnv {
    config: EnvConfig,
    index: BTreeMap<String, PathBuf>,
    fetcher: Arc<dyn Fetcher>,
}

impl OntoEnv {
    /// Scan the configured directories; fetches go over HTTP.
    ///
    /// Scanning parses every ontology file it finds, so call this from a
    /// blocking context.
    pub fn new(config: EnvConfig) -> Result<Self, OntoEnvError> {
        let fetcher = Arc::new(HttpFetcher::new(config.fetch_timeout)?);
        Ok(Self::with_fetcher(config, fetcher))
    }

    pub fn with_fetcher(config: EnvConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let index = scan(&config.search_dirs);
        info!(
            ontologies = index.len(),
            dirs = config.search_dirs.len(),
            offline = config.offline,
            "ontology environment ready"
        );
        Self { config, index, fetcher }
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// Number of ontology IRIs available locally
    pub fn ontology_count(&self) -> usize {
        self.index.len()
    }

    pub fn resolve_local(&self, iri: &str) -> Option<&Path> {
        self.index.get(iri).map(PathBuf::as_path)
    }

    /// Fetch and parse one document
    pub async fn load(&self, source: &OntologySource) -> Result<Graph, OntoEnvError> {
        match source {
            OntologySource::Url(url) => {
                if self.config.offline {
                    return Err(OntoEnvError::Offline(url.clone()));
                }
                let document = self.fetcher.fetch(url).await?;
                parse_document(document.text, document.format, document.location).await
            }
            OntologySource::File(path) => {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| OntoEnvError::Io {
                        path: path.clone(),
                        source,
                    })?;
                let format = source.format_hint().unwrap_or(RdfFormat::Turtle);
                parse_document(text, format, source.base_iri()).await
            }
        }
    }

    /// Merge the transitive `owl:imports` closure of `graph` into it
    pub async fn import_dependencies(&self, graph: &mut Graph) -> Result<ImportReport, OntoEnvError> {
        let mut report = ImportReport::default();
        let mut visited: HashSet<String> = declared_ontologies(graph).into_iter().collect();
        let mut queue: VecDeque<String> = imports_of(graph).into_iter().collect();

        while let Some(iri) = queue.pop_front() {
            if !visited.insert(iri.clone()) {
                continue;
            }

            match self.resolve_import(&iri).await {
                Ok(imported) => {
                    visited.extend(declared_ontologies(&imported));
                    queue.extend(imports_of(&imported).into_iter().filter(|i| !visited.contains(i)));
                    let added = graph.merge(&imported);
                    debug!(%iri, added, "merged import");
                    report.resolved.push(iri);
                }
                Err(e) if self.config.strict => {
                    return Err(OntoEnvError::UnresolvedImport {
                        iri,
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    warn!(%iri, error = %e, "could not resolve import");
                    report.unresolved.push(iri);
                }
            }
        }

        info!(
            resolved = report.resolved.len(),
            unresolved = report.unresolved.len(),
            triples = graph.len(),
            "resolved import closure"
        );
        Ok(report)
    }

    async fn resolve_import(&self, iri: &str) -> Result<Graph, OntoEnvError> {
        if let Some(path) = self.index.get(iri) {
            debug!(%iri, path = %path.display(), "import resolved locally");
            return self.load(&OntologySource::File(path.clone())).await;
        }
        if self.config.offline {
            return Err(OntoEnvError::Offline(iri.to_string()));
        }
        self.load(&OntologySource::Url(iri.to_string())).await
    }
}

/// Load a base ontology and merge its import closure
pub async fn load_shapes_graph(
    source: &OntologySource,
    env: &OntoEnv,
) -> Result<(Graph, ImportReport), OntoEnvError> {
    let mut graph = env.load(source).await?;
    info!(%source, triples = graph.len(), "loaded base ontology");
    let report = env.import_dependencies(&mut graph).await?;
    Ok((graph, report))
}

async fn parse_document(text: String, format: RdfFormat, location: String) -> Result<Graph, OntoEnvError> {
    tokio::task::spawn_blocking(move || {
        let mut graph = Graph::new();
        parse_into(&mut graph, &text, format, Some(location.as_str())).map_err(|source| OntoEnvError::Parse {
            location: location.clone(),
            source,
        })?;
        Ok(graph)
    })
    .await?
}

fn declared_ontologies(graph: &Graph) -> BTreeSet<String> {
    let mut declared = BTreeSet::new();
    for ontology in graph.subjects(rdf::TYPE, &Term::iri(owl::ONTOLOGY)) {
        if let Some(iri) = ontology.as_iri() {
            declared.insert(iri.as_str().to_string());
        }
        for version in graph.objects(ontology, owl::VERSION_IRI) {
            if let Some(iri) = version.as_iri() {
                declared.insert(iri.as_str().to_string());
            }
        }
    }
    declared
}

fn imports_of(graph: &Graph) -> Vec<String> {
    let imports: BTreeSet<String> = graph
        .with_predicate(owl::IMPORTS)
        .into_iter()
        .filter_map(|t| t.object.as_iri())
        .map(|iri| iri.as_str().to_string())
        .collect();
    imports.into_iter().collect()
}

fn scan(dirs: &[PathBuf]) -> BTreeMap<String, PathBuf> {
    let mut index: BTreeMap<String, PathBuf> = BTreeMap::new();

    for dir in dirs {
        for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "cannot read ontology directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(format) = path.to_str().and_then(RdfFormat::from_location) else {
                continue;
            };

            match index_file(path, format) {
                Ok(declared) if declared.is_empty() => {
                    debug!(path = %path.display(), "file declares no ontology");
                }
                Ok(declared) => {
                    for iri in declared {
                        if let Some(existing) = index.get(&iri) {
                            warn!(%iri, kept = %existing.display(), ignored = %path.display(), "duplicate ontology");
                            continue;
                        }
                        index.insert(iri, path.to_path_buf());
                    }
                }
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable ontology file"),
            }
        }
    }

    index
}

fn index_file(path: &Path, format: RdfFormat) -> Result<BTreeSet<String>, OntoEnvError> {
    let text = std::fs::read_to_string(path).map_err(|source| OntoEnvError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base = file_iri(path);
    let graph = parse(&text, format, Some(base.as_str())).map_err(|source| OntoEnvError::Parse {
        location: path.display().to_string(),
        source,
    })?;
    Ok(declared_ontologies(&graph))
}
