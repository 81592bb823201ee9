//! # brickval SPARQL
//!
//! SPARQL クエリエンジン
//! The SELECT, ASK and CONSTRUCT forms over basic graph patterns with
//! property paths, OPTIONAL, UNION, MINUS, BIND and FILTER. This is the
//! part of SPARQL 1.1 that SHACL-SPARQL constraints and rules rely on.

pub mod parser;
pub mod evaluator;

// Re-exports
pub use parser::{
    Bindings, DefaultSparqlParser, Expression, Function, GraphPattern, OrderCondition, PropertyPath, QueryType,
    SolutionModifier, SparqlParser, SparqlQuery, TermPattern, TriplePattern, Variable, Verb,
};
pub use evaluator::{DefaultSparqlEvaluator, QueryResult, SparqlEvaluator};

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SparqlError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Evaluation error: {0}")]
    EvaluationError(String),

    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),
}
