//! # brickval core
//!
//! RDF グラフのデータモデルと入出力
//! Terms, triples, an indexed in-memory graph, parsers for Turtle,
//! N-Triples, RDF/XML and JSON-LD, and a JSON-LD serializer.

pub mod model;
pub mod vocab;
pub mod graph;
pub mod parser;
pub mod jsonld;

pub use model::*;
pub use graph::Graph;
pub use parser::{parse, parse_into, RdfFormat};
pub use jsonld::{to_jsonld, to_jsonld_string};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RdfError {
    #[error("Invalid {format} document: {message}")]
    Parse { format: RdfFormat, message: String },

    #[error("Unsupported term: {0}")]
    UnsupportedTerm(String),

    #[error("Serialization error: {0}")]
    Serialize(#[source] serde_json::Error),
}
