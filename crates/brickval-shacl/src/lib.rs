//! # brickval SHACL
//!
//! SHACL Core 検証エンジン
//! Compiles a shapes graph once, validates data graphs against it and runs
//! the inference (subclass closure, inverse properties, triple and SPARQL
//! rules) that validation depends on. SELECT-based `sh:sparql` constraints
//! are evaluated with `$this` bound to each focus node.

pub mod vocab;
pub mod hierarchy;
pub mod loader;
pub mod validator;
pub mod report;
pub mod inference;
pub mod sparql;

pub use hierarchy::ClassHierarchy;
pub use inference::{InferenceStats, RuleKind, RuleNode, ShapeRule};
pub use loader::{
    Constraint, DefaultShaclLoader, NodeKind, PropertyPath, Shape, ShapeKind, ShapesGraph, ShaclLoader,
    SkippedParameter, SkippedShape, Target, ViolationLevel,
};
pub use sparql::SparqlConstraint;
pub use report::{ValidationReport, ValidationResult};
pub use validator::{DefaultShaclEngine, ShaclEngine, ValidationConfig, ValidationOutcome};

use brickval_core::RdfError;
use thiserror::Error;

/// SHACL errors
#[derive(Error, Debug)]
pub enum ShaclError {
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("RDF error: {0}")]
    Rdf(#[from] RdfError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickval_core::vocab::rdf;
    use brickval_core::{parse, Graph, RdfFormat, Term};

    const SHAPES: &str = r#"
@prefix sh: <http://www.w3.org/ns/shacl#> .
@prefix ex: <http://example.org/> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

ex:PersonShape a sh:NodeShape ;
    sh:targetClass ex:Person ;
    sh:property [
        sh:path ex:name ;
        sh:minCount 1 ;
        sh:datatype xsd:string ;
    ] .
"#;

    fn shapes() -> ShapesGraph {
        ShapesGraph::from_graph(parse(SHAPES, RdfFormat::Turtle, None).unwrap()).unwrap()
    }

    #[test]
    fn test_loader_finds_node_and_property_shapes() {
        let shapes = shapes();
        assert_eq!(shapes.shape_count(), 2);

        let person = shapes.get_shape(&Term::iri("http://example.org/PersonShape")).unwrap();
        assert!(!person.is_property_shape());
        assert_eq!(person.targets, vec![Target::Class(Term::iri("http://example.org/Person"))]);
        assert!(shapes.skipped().is_empty());
    }

    #[test]
    fn test_missing_property_is_reported() {
        let mut data = Graph::new();
        data.insert(brickval_core::Triple::new(
            brickval_core::Iri::new("http://example.org/bob"),
            brickval_core::Iri::new(rdf::TYPE),
            brickval_core::Iri::new("http://example.org/Person"),
        ));

        let engine = DefaultShaclEngine::new();
        let outcome = engine.validate(&data, &shapes()).unwrap();
        assert!(!outcome.conforms);
        assert_eq!(outcome.report.results.len(), 1);
        assert_eq!(
            outcome.report.results[0].source_constraint_component.as_str(),
            vocab::component("MinCount")
        );
    }

    #[test]
    fn test_empty_data_graph_conforms() {
        let engine = DefaultShaclEngine::new();
        let outcome = engine.validate(&Graph::new(), &shapes()).unwrap();
        assert!(outcome.conforms);
        assert!(outcome.report_text.contains("Conforms: True"));
    }
}
