//! SHACL 検証レポート

use crate::loader::ViolationLevel;
use crate::vocab as sh;
use brickval_core::vocab::rdf;
use brickval_core::{Graph, Iri, Literal, Term, Triple};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Validation report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub conforms: bool,
    pub results: Vec<ValidationResult>,
}

/// One validation result.
///
/// Field order matters: the derived `Ord` sorts results by shape, focus node
/// and value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValidationResult {
    pub source_shape: Term,
    pub focus_node: Term,
    pub value: Option<Term>,
    pub result_path: Option<Term>,
    pub source_constraint_component: Iri,
    pub severity: ViolationLevel,
    pub messages: Vec<Literal>,
}

impl ValidationReport {
    /// Build a report; results are sorted and deduplicated
    pub fn new(mut results: Vec<ValidationResult>) -> Self {
        results.sort();
        results.dedup();
        Self {
            conforms: results.is_empty(),
            results,
        }
    }

    pub fn conforming() -> Self {
        Self::new(Vec::new())
    }

    pub fn violation_count(&self) -> usize {
        self.count(ViolationLevel::Violation)
    }

    pub fn warning_count(&self) -> usize {
        self.count(ViolationLevel::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count(ViolationLevel::Info)
    }

    fn count(&self, level: ViolationLevel) -> usize {
        self.results.iter().filter(|r| r.severity == level).count()
    }

    /// Report graph in the W3C SHACL report vocabulary.
    ///
    /// Blank node result paths are copied from `shapes` so the path
    /// structure is readable on its own.
    pub fn to_graph(&self, shapes: &Graph) -> Graph {
        let mut graph = Graph::new();
        let report = Term::bnode("report");

        graph.insert(Triple::new(report.clone(), Iri::new(rdf::TYPE), Iri::new(sh::VALIDATION_REPORT)));
        graph.insert(Triple::new(report.clone(), Iri::new(sh::CONFORMS), Literal::boolean(self.conforms)));

        let mut copied = HashSet::new();
        for (index, result) in self.results.iter().enumerate() {
            let node = Term::bnode(format!("result{}", index + 1));
            graph.insert(Triple::new(report.clone(), Iri::new(sh::RESULT), node.clone()));
            graph.insert(Triple::new(node.clone(), Iri::new(rdf::TYPE), Iri::new(sh::VALIDATION_RESULT)));
            graph.insert(Triple::new(node.clone(), Iri::new(sh::FOCUS_NODE), result.focus_node.clone()));
            graph.insert(Triple::new(node.clone(), Iri::new(sh::SOURCE_SHAPE), result.source_shape.clone()));
            graph.insert(Triple::new(
                node.clone(),
                Iri::new(sh::SOURCE_CONSTRAINT_COMPONENT),
                result.source_constraint_component.clone(),
            ));
            graph.insert(Triple::new(
                node.clone(),
                Iri::new(sh::RESULT_SEVERITY),
                Iri::new(result.severity.iri()),
            ));

            if let Some(path) = &result.result_path {
                graph.insert(Triple::new(node.clone(), Iri::new(sh::RESULT_PATH), path.clone()));
                if path.is_blank() {
                    copy_blank_structure(shapes, path, &mut graph, &mut copied);
                }
            }
            if let Some(value) = &result.value {
                graph.insert(Triple::new(node.clone(), Iri::new(sh::VALUE), value.clone()));
            }
            for message in &result.messages {
                graph.insert(Triple::new(node.clone(), Iri::new(sh::RESULT_MESSAGE), message.clone()));
            }
        }

        graph
    }

    /// Human-readable report text
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

fn copy_blank_structure(source: &Graph, node: &Term, target: &mut Graph, copied: &mut HashSet<Term>) {
    if !copied.insert(node.clone()) {
        return;
    }
    for triple in source.outgoing(node) {
        target.insert(triple.clone());
        if triple.object.is_blank() {
            copy_blank_structure(source, &triple.object, target, copied);
        }
    }
}

impl ViolationLevel {
    fn heading(&self) -> &'static str {
        match self {
            ViolationLevel::Violation => "Constraint Violation",
            ViolationLevel::Warning => "Validation Warning",
            ViolationLevel::Info => "Validation Info",
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation Report")?;
        writeln!(f, "Conforms: {}", if self.conforms { "True" } else { "False" })?;
        if self.results.is_empty() {
            return Ok(());
        }

        writeln!(f, "Results ({}):", self.results.len())?;
        for result in &self.results {
            let component = result.source_constraint_component.as_str();
            let short = component.strip_prefix(sh::SH).unwrap_or(component);
            writeln!(f, "{} in {} ({}):", result.severity.heading(), short, component)?;
            writeln!(f, "\tSeverity: sh:{:?}", result.severity)?;
            writeln!(f, "\tSource Shape: {}", result.source_shape)?;
            writeln!(f, "\tFocus Node: {}", result.focus_node)?;
            if let Some(value) = &result.value {
                writeln!(f, "\tValue Node: {}", value)?;
            }
            if let Some(path) = &result.result_path {
                writeln!(f, "\tResult Path: {}", path)?;
            }
            for message in &result.messages {
                writeln!(f, "\tMessage: {}", message.lexical)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(shape: &str, focus: &str, component: &str) -> ValidationResult {
        ValidationResult {
            source_shape: Term::iri(shape),
            focus_node: Term::iri(focus),
            value: None,
            result_path: Some(Term::iri("http://example.org/name")),
            source_constraint_component: Iri::new(sh::component(component)),
            severity: ViolationLevel::Violation,
            messages: vec![Literal::string("Less than 1 values")],
        }
    }

    #[test]
    fn test_results_sorted_and_deduplicated() {
        let report = ValidationReport::new(vec![
            result("ex:S2", "ex:a", "MinCount"),
            result("ex:S1", "ex:b", "MinCount"),
            result("ex:S1", "ex:a", "MinCount"),
            result("ex:S1", "ex:a", "MinCount"),
        ]);

        assert!(!report.conforms);
        assert_eq!(report.results.len(), 3);
        assert_eq!(report.results[0].source_shape, Term::iri("ex:S1"));
        assert_eq!(report.results[0].focus_node, Term::iri("ex:a"));
        assert_eq!(report.results[2].source_shape, Term::iri("ex:S2"));
    }

    #[test]
    fn test_warning_still_fails_conformance() {
        let mut warning = result("ex:S", "ex:a", "MinCount");
        warning.severity = ViolationLevel::Warning;
        let report = ValidationReport::new(vec![warning]);

        assert!(!report.conforms);
        assert_eq!(report.violation_count(), 0);
        assert_eq!(report.warning_count(), 1);
    }

    #[test]
    fn test_report_graph_vocabulary() {
        let report = ValidationReport::new(vec![result("ex:S", "ex:a", "MinCount")]);
        let graph = report.to_graph(&Graph::new());

        let root = Term::bnode("report");
        let first = Term::bnode("result1");
        assert!(graph.has_type(&root, sh::VALIDATION_REPORT));
        assert_eq!(
            graph.object(&root, sh::CONFORMS),
            Some(&Term::literal(Literal::boolean(false)))
        );
        assert_eq!(graph.object(&root, sh::RESULT), Some(&first));
        assert_eq!(graph.object(&first, sh::FOCUS_NODE), Some(&Term::iri("ex:a")));
        assert_eq!(
            graph.object(&first, sh::RESULT_SEVERITY),
            Some(&Term::iri(sh::VIOLATION))
        );
    }

    #[test]
    fn test_blank_result_path_is_copied() {
        let path = Term::bnode("p1");
        let mut shapes = Graph::new();
        shapes.insert(Triple::new(path.clone(), Iri::new(sh::INVERSE_PATH), Iri::new("ex:hasPoint")));

        let mut with_path = result("ex:S", "ex:a", "MinCount");
        with_path.result_path = Some(path.clone());
        let graph = ValidationReport::new(vec![with_path]).to_graph(&shapes);

        assert_eq!(graph.object(&path, sh::INVERSE_PATH), Some(&Term::iri("ex:hasPoint")));
    }

    #[test]
    fn test_conforming_text() {
        let text = ValidationReport::conforming().to_text();
        assert_eq!(text, "Validation Report\nConforms: True\n");
    }

    #[test]
    fn test_violation_text() {
        let report = ValidationReport::new(vec![result("ex:S", "ex:a", "MinCount")]);
        let text = report.to_text();
        assert!(text.contains("Conforms: False"));
        assert!(text.contains("Constraint Violation in MinCountConstraintComponent"));
        assert!(text.contains("Message: Less than 1 values"));
    }
}
