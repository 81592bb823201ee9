//! 推論 (RDFS サブクラス閉包 + owl:inverseOf + sh:TripleRule + sh:SPARQLRule)
//!
//! Inference runs in rounds until no round adds a triple or the round limit
//! is reached. Each round sees the triples added by the previous one, so
//! rules can chain through inferred types.

use crate::loader::{is_deactivated, Shape};
use crate::sparql;
use crate::validator::ValidationContext;
use crate::vocab as sh;
use crate::ShapesGraph;
use brickval_core::vocab::rdf;
use brickval_core::{Graph, Iri, Term, Triple};
use brickval_sparql::{Bindings, DefaultSparqlEvaluator, QueryResult, SparqlEvaluator, SparqlQuery, Variable};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Node expression of a triple rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleNode {
    /// `sh:this`, the focus node
    This,
    Constant(Term),
}

impl RuleNode {
    fn resolve(&self, focus: &Term) -> Term {
        match self {
            RuleNode::This => focus.clone(),
            RuleNode::Constant(term) => term.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum RuleKind {
    /// `sh:TripleRule`
    Triple {
        subject: RuleNode,
        predicate: Iri,
        object: RuleNode,
    },
    /// `sh:SPARQLRule` with a CONSTRUCT query
    Sparql(SparqlQuery),
}

/// A rule attached to a shape through `sh:rule`
#[derive(Debug, Clone)]
pub struct ShapeRule {
    pub id: Term,
    /// Shape whose focus nodes the rule is applied to
    pub shape: Term,
    pub kind: RuleKind,
    pub conditions: Vec<Term>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InferenceStats {
    pub rounds: usize,
    pub added: usize,
}

/// Compile the rules attached to `shapes`, returning the rules and the
/// number of rules that cannot be evaluated.
pub(crate) fn compile_rules(graph: &Graph, shapes: &BTreeMap<Term, Shape>) -> (Vec<ShapeRule>, usize) {
    let mut rules = Vec::new();
    let mut unsupported = 0;

    for shape in shapes.values().filter(|s| !s.deactivated) {
        for rule in graph.objects(&shape.id, sh::RULE) {
            if is_deactivated(graph, rule) {
                continue;
            }
            let kind = if graph.has_type(rule, sh::SPARQL_RULE) {
                sparql_rule(graph, rule)
            } else {
                triple_rule(graph, rule)
            };
            match kind {
                Some(kind) => rules.push(ShapeRule {
                    id: rule.clone(),
                    shape: shape.id.clone(),
                    kind,
                    conditions: graph.objects(rule, sh::CONDITION).into_iter().cloned().collect(),
                }),
                None => {
                    debug!(rule = %rule, "skipping rule that cannot be compiled");
                    unsupported += 1;
                }
            }
        }
    }

    (rules, unsupported)
}

fn triple_rule(graph: &Graph, rule: &Term) -> Option<RuleKind> {
    let subject = rule_node(graph.object(rule, sh::SUBJECT)?)?;
    let predicate = graph.object(rule, sh::PREDICATE)?.as_iri()?.clone();
    let object = rule_node(graph.object(rule, sh::OBJECT)?)?;
    Some(RuleKind::Triple { subject, predicate, object })
}

fn sparql_rule(graph: &Graph, rule: &Term) -> Option<RuleKind> {
    let text = graph.object(rule, sh::CONSTRUCT)?.as_literal()?;
    match sparql::parse_query(graph, rule, &text.lexical, None) {
        Ok(query) if query.is_construct() => Some(RuleKind::Sparql(query)),
        Ok(_) => None,
        Err(e) => {
            debug!(rule = %rule, error = %e, "unusable sh:construct query");
            None
        }
    }
}

/// Blank nodes are node expressions other than `sh:this`; only constants
/// and `sh:this` are evaluated.
fn rule_node(term: &Term) -> Option<RuleNode> {
    match term {
        t if t.is(sh::THIS) => Some(RuleNode::This),
        Term::BlankNode(_) => None,
        t => Some(RuleNode::Constant(t.clone())),
    }
}

/// Expand `data` to a fixpoint, bounded by `max_rounds`
pub(crate) fn run(data: &Graph, shapes: &ShapesGraph, max_rounds: usize) -> (Graph, InferenceStats) {
    let mut graph = data.clone();
    let mut stats = InferenceStats::default();

    while stats.rounds < max_rounds {
        stats.rounds += 1;
        let inferred = infer_round(&graph, shapes);
        let added = graph.extend(inferred);
        stats.added += added;
        if added == 0 {
            return (graph, stats);
        }
    }

    warn!(rounds = max_rounds, "inference stopped at the round limit before reaching a fixpoint");
    (graph, stats)
}

fn infer_round(graph: &Graph, shapes: &ShapesGraph) -> Vec<Triple> {
    let mut inferred = Vec::new();
    let hierarchy = shapes.hierarchy().extended_with(graph);

    for triple in graph.with_predicate(rdf::TYPE) {
        for superclass in hierarchy.superclasses(&triple.object) {
            if let Term::Iri(class) = superclass {
                inferred.push(Triple::new(triple.subject.clone(), Iri::new(rdf::TYPE), class.clone()));
            }
        }
    }

    for (predicate, inverses) in shapes.inverses() {
        for triple in graph.with_predicate(predicate.as_str()) {
            if triple.object.is_literal() {
                continue;
            }
            for inverse in inverses {
                inferred.push(Triple::new(triple.object.clone(), inverse.clone(), triple.subject.clone()));
            }
        }
    }

    let context = ValidationContext::new(graph, shapes, &hierarchy);
    let evaluator = DefaultSparqlEvaluator::new();
    for rule in shapes.rules() {
        let Some(shape) = shapes.get_shape(&rule.shape) else {
            continue;
        };
        for focus in context.focus_nodes(shape) {
            if !rule.conditions.iter().all(|c| context.conforms(&focus, c, 0)) {
                continue;
            }
            match &rule.kind {
                RuleKind::Triple { subject, predicate, object } => {
                    let subject = subject.resolve(&focus);
                    if subject.is_literal() {
                        continue;
                    }
                    inferred.push(Triple {
                        subject,
                        predicate: predicate.clone(),
                        object: object.resolve(&focus),
                    });
                }
                RuleKind::Sparql(query) => {
                    let initial = Bindings::from([(Variable::new("this"), focus.clone())]);
                    match evaluator.evaluate(query, &[graph, shapes.graph()], &initial) {
                        Ok(QueryResult::Construct { triples }) => inferred.extend(triples),
                        Ok(_) => {}
                        Err(e) => warn!(rule = %rule.id, focus = %focus, error = %e, "SPARQL rule failed"),
                    }
                }
            }
        }
    }

    inferred
}
