//! # brickval ontoenv
//!
//! Loads an ontology document and merges its `owl:imports` closure,
//! preferring ontologies found in local directories and fetching the rest.

pub mod source;
pub mod fetch;
pub mod env;

pub use env::{load_shapes_graph, EnvConfig, ImportReport, OntoEnv};
pub use fetch::{FetchedDocument, Fetcher, HttpFetcher};
pub use source::OntologySource;

use brickval_core::RdfError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OntoEnvError {
    #[error("HTTP request for {url:?} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: RdfError,
    },

    #[error("{0} is not available locally and the environment is offline")]
    Offline(String),

    #[error("Unresolved import {iri}: {reason}")]
    UnresolvedImport { iri: String, reason: String },

    #[error("Document {0} not found")]
    NotFound(String),

    #[error("Blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
