//! SHACL ShapesGraph 読み込み
//!
//! Compiles the shapes found in an RDF graph into [`Shape`] values. The
//! compiled [`ShapesGraph`] is immutable and can be shared between threads.

use crate::hierarchy::ClassHierarchy;
use crate::inference::{compile_rules, ShapeRule};
use crate::sparql::{self, SparqlConstraint};
use crate::vocab as sh;
use crate::ShaclError;
use brickval_core::vocab::{owl, rdf, rdfs};
use brickval_core::{Graph, Iri, Literal, Term};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info, warn};

/// Shapes Graph
#[derive(Debug, Clone)]
pub struct ShapesGraph {
    graph: Graph,
    shapes: BTreeMap<Term, Shape>,
    hierarchy: ClassHierarchy,
    inverses: HashMap<Iri, Vec<Iri>>,
    rules: Vec<ShapeRule>,
    skipped: Vec<SkippedShape>,
    skipped_parameters: Vec<SkippedParameter>,
    unsupported: usize,
}

/// A shape that could not be compiled
#[derive(Debug, Clone)]
pub struct SkippedShape {
    pub id: Term,
    pub reason: String,
}

/// A constraint parameter that could not be compiled; the rest of its
/// shape is still in force
#[derive(Debug, Clone)]
pub struct SkippedParameter {
    pub shape: Term,
    pub parameter: Iri,
    pub reason: String,
}

/// Node shape or property shape
#[derive(Debug, Clone)]
pub struct Shape {
    pub id: Term,
    pub kind: ShapeKind,
    pub targets: Vec<Target>,
    pub constraints: Vec<Constraint>,
    pub severity: ViolationLevel,
    pub messages: Vec<Literal>,
    pub deactivated: bool,
}

#[derive(Debug, Clone)]
pub enum ShapeKind {
    Node,
    /// `path_node` is the `sh:path` value as written in the shapes graph
    Property { path: PropertyPath, path_node: Term },
}

/// Focus node selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Class(Term),
    Node(Term),
    SubjectsOf(Iri),
    ObjectsOf(Iri),
}

/// Property Path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyPath {
    Predicate(Iri),
    Inverse(Box<PropertyPath>),
    Sequence(Vec<PropertyPath>),
    Alternative(Vec<PropertyPath>),
    ZeroOrMore(Box<PropertyPath>),
    OneOrMore(Box<PropertyPath>),
    ZeroOrOne(Box<PropertyPath>),
}

/// Node Kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    BlankNode,
    Iri,
    Literal,
    BlankNodeOrIri,
    BlankNodeOrLiteral,
    IriOrLiteral,
}

impl NodeKind {
    fn from_iri(iri: &str) -> Option<Self> {
        match iri {
            sh::BLANK_NODE => Some(NodeKind::BlankNode),
            sh::IRI => Some(NodeKind::Iri),
            sh::LITERAL => Some(NodeKind::Literal),
            sh::BLANK_NODE_OR_IRI => Some(NodeKind::BlankNodeOrIri),
            sh::BLANK_NODE_OR_LITERAL => Some(NodeKind::BlankNodeOrLiteral),
            sh::IRI_OR_LITERAL => Some(NodeKind::IriOrLiteral),
            _ => None,
        }
    }

    pub fn matches(&self, term: &Term) -> bool {
        match self {
            NodeKind::BlankNode => term.is_blank(),
            NodeKind::Iri => term.is_iri(),
            NodeKind::Literal => term.is_literal(),
            NodeKind::BlankNodeOrIri => !term.is_literal(),
            NodeKind::BlankNodeOrLiteral => !term.is_iri(),
            NodeKind::IriOrLiteral => !term.is_blank(),
        }
    }
}

/// Result severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum ViolationLevel {
    Violation,
    Warning,
    Info,
}

impl ViolationLevel {
    pub fn iri(&self) -> &'static str {
        match self {
            ViolationLevel::Violation => sh::VIOLATION,
            ViolationLevel::Warning => sh::WARNING,
            ViolationLevel::Info => sh::INFO,
        }
    }
}

/// SHACL Core constraints, plus SELECT-based `sh:sparql`
#[derive(Debug, Clone)]
pub enum Constraint {
    Class(Term),
    Datatype(Iri),
    NodeKind(NodeKind),
    MinCount(u64),
    MaxCount(u64),
    MinExclusive(Literal),
    MinInclusive(Literal),
    MaxExclusive(Literal),
    MaxInclusive(Literal),
    MinLength(u64),
    MaxLength(u64),
    Pattern { regex: Regex, pattern: String },
    LanguageIn(Vec<String>),
    UniqueLang,
    Equals(Iri),
    Disjoint(Iri),
    LessThan(Iri),
    LessThanOrEquals(Iri),
    Not(Term),
    And(Vec<Term>),
    Or(Vec<Term>),
    Xone(Vec<Term>),
    Node(Term),
    Property(Term),
    QualifiedValueShape {
        shape: Term,
        min: Option<u64>,
        max: Option<u64>,
    },
    Closed { allowed: BTreeSet<Iri> },
    HasValue(Term),
    In(Vec<Term>),
    Sparql(SparqlConstraint),
}

impl Constraint {
    /// Short component name, e.g. `MinCount`
    pub fn component_name(&self) -> &'static str {
        match self {
            Constraint::Class(_) => "Class",
            Constraint::Datatype(_) => "Datatype",
            Constraint::NodeKind(_) => "NodeKind",
            Constraint::MinCount(_) => "MinCount",
            Constraint::MaxCount(_) => "MaxCount",
            Constraint::MinExclusive(_) => "MinExclusive",
            Constraint::MinInclusive(_) => "MinInclusive",
            Constraint::MaxExclusive(_) => "MaxExclusive",
            Constraint::MaxInclusive(_) => "MaxInclusive",
            Constraint::MinLength(_) => "MinLength",
            Constraint::MaxLength(_) => "MaxLength",
            Constraint::Pattern { .. } => "Pattern",
            Constraint::LanguageIn(_) => "LanguageIn",
            Constraint::UniqueLang => "UniqueLang",
            Constraint::Equals(_) => "Equals",
            Constraint::Disjoint(_) => "Disjoint",
            Constraint::LessThan(_) => "LessThan",
            Constraint::LessThanOrEquals(_) => "LessThanOrEquals",
            Constraint::Not(_) => "Not",
            Constraint::And(_) => "And",
            Constraint::Or(_) => "Or",
            Constraint::Xone(_) => "Xone",
            Constraint::Node(_) => "Node",
            Constraint::Property(_) => "Property",
            Constraint::QualifiedValueShape { min: Some(_), .. } => "QualifiedMinCount",
            Constraint::QualifiedValueShape { .. } => "QualifiedMaxCount",
            Constraint::Closed { .. } => "Closed",
            Constraint::HasValue(_) => "HasValue",
            Constraint::In(_) => "In",
            Constraint::Sparql(_) => "SPARQL",
        }
    }

    /// Full constraint component IRI
    pub fn component(&self) -> Iri {
        Iri::new(sh::component(self.component_name()))
    }
}

impl Shape {
    pub fn is_property_shape(&self) -> bool {
        matches!(self.kind, ShapeKind::Property { .. })
    }

    pub fn path(&self) -> Option<&PropertyPath> {
        match &self.kind {
            ShapeKind::Property { path, .. } => Some(path),
            ShapeKind::Node => None,
        }
    }

    pub fn path_node(&self) -> Option<&Term> {
        match &self.kind {
            ShapeKind::Property { path_node, .. } => Some(path_node),
            ShapeKind::Node => None,
        }
    }
}

impl ShapesGraph {
    /// Compile every shape found in `graph`.
    ///
    /// Malformed shapes are skipped and recorded rather than failing the
    /// whole load; see [`ShapesGraph::skipped`].
    pub fn from_graph(graph: Graph) -> Result<Self, ShaclError> {
        let loader = DefaultShaclLoader;
        loader.load_from_graph(graph)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn get_shape(&self, id: &Term) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// Shapes in deterministic (term) order
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn hierarchy(&self) -> &ClassHierarchy {
        &self.hierarchy
    }

    /// `owl:inverseOf` pairs, both directions
    pub fn inverses(&self) -> &HashMap<Iri, Vec<Iri>> {
        &self.inverses
    }

    pub fn rules(&self) -> &[ShapeRule] {
        &self.rules
    }

    pub fn skipped(&self) -> &[SkippedShape] {
        &self.skipped
    }

    pub fn skipped_parameters(&self) -> &[SkippedParameter] {
        &self.skipped_parameters
    }

    /// Count of rules that could not be compiled and are never applied
    pub fn unsupported_count(&self) -> usize {
        self.unsupported
    }
}

/// SHACL Loader trait
pub trait ShaclLoader {
    fn load_from_graph(&self, graph: Graph) -> Result<ShapesGraph, ShaclError>;
}

/// Default SHACL Loader
pub struct DefaultShaclLoader;

impl ShaclLoader for DefaultShaclLoader {
    fn load_from_graph(&self, graph: Graph) -> Result<ShapesGraph, ShaclError> {
        let mut shapes = BTreeMap::new();
        let mut skipped = Vec::new();
        let mut skipped_parameters = Vec::new();

        for id in shape_candidates(&graph) {
            match compile_shape(&graph, &id, &mut skipped_parameters) {
                Ok(shape) => {
                    shapes.insert(id, shape);
                }
                Err(e) => {
                    debug!(shape = %id, error = %e, "skipping shape");
                    skipped.push(SkippedShape {
                        id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let hierarchy = ClassHierarchy::from_graph(&graph);
        let inverses = inverse_pairs(&graph);
        let (rules, unsupported) = compile_rules(&graph, &shapes);

        if !skipped.is_empty() {
            warn!(count = skipped.len(), "some shapes could not be compiled and were skipped");
        }
        if unsupported > 0 {
            warn!(count = unsupported, "some rules could not be compiled and are not applied");
        }
        info!(
            shapes = shapes.len(),
            rules = rules.len(),
            classes = hierarchy.class_count(),
            triples = graph.len(),
            "compiled shapes graph"
        );

        Ok(ShapesGraph {
            graph,
            shapes,
            hierarchy,
            inverses,
            rules,
            skipped,
            skipped_parameters,
            unsupported,
        })
    }
}

/// Every node that acts as a shape somewhere in the graph
fn shape_candidates(graph: &Graph) -> BTreeSet<Term> {
    let mut candidates = BTreeSet::new();

    for class in [sh::NODE_SHAPE, sh::PROPERTY_SHAPE] {
        candidates.extend(graph.subjects(rdf::TYPE, &Term::iri(class)).into_iter().cloned());
    }

    for predicate in [
        sh::TARGET_CLASS,
        sh::TARGET_NODE,
        sh::TARGET_SUBJECTS_OF,
        sh::TARGET_OBJECTS_OF,
        sh::PATH,
    ] {
        candidates.extend(graph.with_predicate(predicate).into_iter().map(|t| t.subject.clone()));
    }

    for predicate in [sh::PROPERTY, sh::NODE, sh::NOT, sh::QUALIFIED_VALUE_SHAPE, sh::CONDITION] {
        candidates.extend(graph.with_predicate(predicate).into_iter().map(|t| t.object.clone()));
    }

    for predicate in [sh::AND, sh::OR, sh::XONE] {
        for triple in graph.with_predicate(predicate) {
            if let Some(members) = graph.list(&triple.object) {
                candidates.extend(members);
            }
        }
    }

    candidates.retain(|c| !c.is_literal());
    candidates
}

fn compile_shape(graph: &Graph, id: &Term, skipped: &mut Vec<SkippedParameter>) -> Result<Shape, ShaclError> {
    let paths = graph.objects(id, sh::PATH);
    let kind = match paths.as_slice() {
        [] => ShapeKind::Node,
        [path_node] => ShapeKind::Property {
            path: parse_path(graph, path_node, 0)?,
            path_node: (*path_node).clone(),
        },
        _ => return Err(ShaclError::InvalidShape(format!("{} has more than one sh:path", id))),
    };

    let path = match &kind {
        ShapeKind::Property { path, .. } => Some(path),
        ShapeKind::Node => None,
    };
    let constraints = compile_constraints(graph, id, path, skipped);

    let shape = Shape {
        id: id.clone(),
        targets: compile_targets(graph, id),
        constraints,
        severity: compile_severity(graph, id),
        messages: graph
            .objects(id, sh::MESSAGE)
            .into_iter()
            .filter_map(|t| t.as_literal().cloned())
            .collect(),
        deactivated: is_deactivated(graph, id),
        kind,
    };

    Ok(shape)
}

fn compile_targets(graph: &Graph, id: &Term) -> Vec<Target> {
    let mut targets = Vec::new();

    for class in graph.objects(id, sh::TARGET_CLASS) {
        targets.push(Target::Class(class.clone()));
    }

    // implicit class target: the shape is also a class
    let is_class = graph.has_type(id, rdfs::CLASS) || graph.has_type(id, owl::CLASS);
    if is_class && !targets.contains(&Target::Class(id.clone())) {
        targets.push(Target::Class(id.clone()));
    }

    for node in graph.objects(id, sh::TARGET_NODE) {
        targets.push(Target::Node(node.clone()));
    }
    for predicate in graph.objects(id, sh::TARGET_SUBJECTS_OF) {
        if let Some(iri) = predicate.as_iri() {
            targets.push(Target::SubjectsOf(iri.clone()));
        }
    }
    for predicate in graph.objects(id, sh::TARGET_OBJECTS_OF) {
        if let Some(iri) = predicate.as_iri() {
            targets.push(Target::ObjectsOf(iri.clone()));
        }
    }

    targets
}

fn compile_severity(graph: &Graph, id: &Term) -> ViolationLevel {
    match graph.object(id, sh::SEVERITY) {
        Some(t) if t.is(sh::WARNING) => ViolationLevel::Warning,
        Some(t) if t.is(sh::INFO) => ViolationLevel::Info,
        _ => ViolationLevel::Violation,
    }
}

const MAX_PATH_DEPTH: usize = 32;

fn parse_path(graph: &Graph, node: &Term, depth: usize) -> Result<PropertyPath, ShaclError> {
    if depth > MAX_PATH_DEPTH {
        return Err(ShaclError::InvalidShape(format!("path {} is nested too deeply", node)));
    }

    match node {
        Term::Iri(iri) => Ok(PropertyPath::Predicate(iri.clone())),
        Term::Literal(_) => Err(ShaclError::InvalidShape(format!("literal {} used as path", node))),
        Term::BlankNode(_) => {
            if let Some(inner) = graph.object(node, sh::INVERSE_PATH) {
                return Ok(PropertyPath::Inverse(Box::new(parse_path(graph, inner, depth + 1)?)));
            }
            if let Some(inner) = graph.object(node, sh::ZERO_OR_MORE_PATH) {
                return Ok(PropertyPath::ZeroOrMore(Box::new(parse_path(graph, inner, depth + 1)?)));
            }
            if let Some(inner) = graph.object(node, sh::ONE_OR_MORE_PATH) {
                return Ok(PropertyPath::OneOrMore(Box::new(parse_path(graph, inner, depth + 1)?)));
            }
            if let Some(inner) = graph.object(node, sh::ZERO_OR_ONE_PATH) {
                return Ok(PropertyPath::ZeroOrOne(Box::new(parse_path(graph, inner, depth + 1)?)));
            }
            if let Some(list) = graph.object(node, sh::ALTERNATIVE_PATH) {
                let members = parse_path_list(graph, list, depth)?;
                return Ok(PropertyPath::Alternative(members));
            }
            if graph.object(node, rdf::FIRST).is_some() {
                let members = parse_path_list(graph, node, depth)?;
                return Ok(PropertyPath::Sequence(members));
            }
            Err(ShaclError::InvalidShape(format!("unrecognised path {}", node)))
        }
    }
}

fn parse_path_list(graph: &Graph, list: &Term, depth: usize) -> Result<Vec<PropertyPath>, ShaclError> {
    let members = graph
        .list(list)
        .ok_or_else(|| ShaclError::InvalidShape(format!("malformed path list {}", list)))?;
    if members.len() < 2 {
        return Err(ShaclError::InvalidShape(format!("path list {} needs two members", list)));
    }
    members.iter().map(|m| parse_path(graph, m, depth + 1)).collect()
}

/// Collects the constraints of one shape; a malformed parameter is
/// recorded and dropped without affecting its siblings.
struct ConstraintSet<'a> {
    shape: &'a Term,
    constraints: Vec<Constraint>,
    skipped: &'a mut Vec<SkippedParameter>,
}

impl ConstraintSet<'_> {
    fn add(&mut self, parameter: &str, constraint: Result<Constraint, ShaclError>) {
        match constraint {
            Ok(constraint) => self.constraints.push(constraint),
            Err(e) => {
                warn!(shape = %self.shape, parameter, error = %e, "ignoring malformed constraint parameter");
                self.skipped.push(SkippedParameter {
                    shape: self.shape.clone(),
                    parameter: Iri::new(parameter),
                    reason: e.to_string(),
                });
            }
        }
    }
}

fn compile_constraints(
    graph: &Graph,
    id: &Term,
    path: Option<&PropertyPath>,
    skipped: &mut Vec<SkippedParameter>,
) -> Vec<Constraint> {
    let mut set = ConstraintSet {
        shape: id,
        constraints: Vec::new(),
        skipped,
    };

    for class in graph.objects(id, sh::CLASS) {
        set.add(sh::CLASS, Ok(Constraint::Class(class.clone())));
    }
    for datatype in graph.objects(id, sh::DATATYPE) {
        set.add(sh::DATATYPE, expect_iri(datatype, sh::DATATYPE).map(Constraint::Datatype));
    }
    for kind in graph.objects(id, sh::NODE_KIND) {
        let kind = kind
            .as_iri()
            .and_then(|iri| NodeKind::from_iri(iri.as_str()))
            .ok_or_else(|| ShaclError::InvalidShape(format!("unknown sh:nodeKind {}", kind)));
        set.add(sh::NODE_KIND, kind.map(Constraint::NodeKind));
    }

    for count in graph.objects(id, sh::MIN_COUNT) {
        set.add(sh::MIN_COUNT, expect_count(count, sh::MIN_COUNT).map(Constraint::MinCount));
    }
    for count in graph.objects(id, sh::MAX_COUNT) {
        set.add(sh::MAX_COUNT, expect_count(count, sh::MAX_COUNT).map(Constraint::MaxCount));
    }
    for length in graph.objects(id, sh::MIN_LENGTH) {
        set.add(sh::MIN_LENGTH, expect_count(length, sh::MIN_LENGTH).map(Constraint::MinLength));
    }
    for length in graph.objects(id, sh::MAX_LENGTH) {
        set.add(sh::MAX_LENGTH, expect_count(length, sh::MAX_LENGTH).map(Constraint::MaxLength));
    }

    for bound in graph.objects(id, sh::MIN_EXCLUSIVE) {
        set.add(sh::MIN_EXCLUSIVE, expect_literal(bound, sh::MIN_EXCLUSIVE).map(Constraint::MinExclusive));
    }
    for bound in graph.objects(id, sh::MIN_INCLUSIVE) {
        set.add(sh::MIN_INCLUSIVE, expect_literal(bound, sh::MIN_INCLUSIVE).map(Constraint::MinInclusive));
    }
    for bound in graph.objects(id, sh::MAX_EXCLUSIVE) {
        set.add(sh::MAX_EXCLUSIVE, expect_literal(bound, sh::MAX_EXCLUSIVE).map(Constraint::MaxExclusive));
    }
    for bound in graph.objects(id, sh::MAX_INCLUSIVE) {
        set.add(sh::MAX_INCLUSIVE, expect_literal(bound, sh::MAX_INCLUSIVE).map(Constraint::MaxInclusive));
    }

    for pattern in graph.objects(id, sh::PATTERN) {
        let flags = graph
            .object(id, sh::FLAGS)
            .and_then(|t| t.as_literal())
            .map(|l| l.lexical.clone());
        let constraint = expect_literal(pattern, sh::PATTERN)
            .and_then(|pattern| compile_pattern(pattern.lexical, flags.as_deref()));
        set.add(sh::PATTERN, constraint);
    }

    for list in graph.objects(id, sh::LANGUAGE_IN) {
        let constraint = expect_list(graph, list, sh::LANGUAGE_IN).map(|tags| {
            Constraint::LanguageIn(
                tags.into_iter()
                    .filter_map(|t| t.as_literal().map(|l| l.lexical.to_ascii_lowercase()))
                    .collect(),
            )
        });
        set.add(sh::LANGUAGE_IN, constraint);
    }
    if graph
        .object(id, sh::UNIQUE_LANG)
        .and_then(|t| t.as_literal())
        .and_then(|l| l.as_bool())
        .unwrap_or(false)
    {
        set.add(sh::UNIQUE_LANG, Ok(Constraint::UniqueLang));
    }

    for property in graph.objects(id, sh::EQUALS) {
        set.add(sh::EQUALS, expect_iri(property, sh::EQUALS).map(Constraint::Equals));
    }
    for property in graph.objects(id, sh::DISJOINT) {
        set.add(sh::DISJOINT, expect_iri(property, sh::DISJOINT).map(Constraint::Disjoint));
    }
    for property in graph.objects(id, sh::LESS_THAN) {
        set.add(sh::LESS_THAN, expect_iri(property, sh::LESS_THAN).map(Constraint::LessThan));
    }
    for property in graph.objects(id, sh::LESS_THAN_OR_EQUALS) {
        set.add(
            sh::LESS_THAN_OR_EQUALS,
            expect_iri(property, sh::LESS_THAN_OR_EQUALS).map(Constraint::LessThanOrEquals),
        );
    }

    for shape in graph.objects(id, sh::NOT) {
        set.add(sh::NOT, Ok(Constraint::Not(shape.clone())));
    }
    for list in graph.objects(id, sh::AND) {
        set.add(sh::AND, expect_list(graph, list, sh::AND).map(Constraint::And));
    }
    for list in graph.objects(id, sh::OR) {
        set.add(sh::OR, expect_list(graph, list, sh::OR).map(Constraint::Or));
    }
    for list in graph.objects(id, sh::XONE) {
        set.add(sh::XONE, expect_list(graph, list, sh::XONE).map(Constraint::Xone));
    }
    for shape in graph.objects(id, sh::NODE) {
        set.add(sh::NODE, Ok(Constraint::Node(shape.clone())));
    }
    for shape in graph.objects(id, sh::PROPERTY) {
        set.add(sh::PROPERTY, Ok(Constraint::Property(shape.clone())));
    }

    // one constraint per bound so each reports its own component
    for shape in graph.objects(id, sh::QUALIFIED_VALUE_SHAPE) {
        if let Some(count) = graph.object(id, sh::QUALIFIED_MIN_COUNT) {
            let constraint = expect_count(count, sh::QUALIFIED_MIN_COUNT).map(|min| {
                Constraint::QualifiedValueShape { shape: shape.clone(), min: Some(min), max: None }
            });
            set.add(sh::QUALIFIED_MIN_COUNT, constraint);
        }
        if let Some(count) = graph.object(id, sh::QUALIFIED_MAX_COUNT) {
            let constraint = expect_count(count, sh::QUALIFIED_MAX_COUNT).map(|max| {
                Constraint::QualifiedValueShape { shape: shape.clone(), min: None, max: Some(max) }
            });
            set.add(sh::QUALIFIED_MAX_COUNT, constraint);
        }
    }

    if graph
        .object(id, sh::CLOSED)
        .and_then(|t| t.as_literal())
        .and_then(|l| l.as_bool())
        .unwrap_or(false)
    {
        set.add(sh::CLOSED, compile_closed(graph, id));
    }

    for value in graph.objects(id, sh::HAS_VALUE) {
        set.add(sh::HAS_VALUE, Ok(Constraint::HasValue(value.clone())));
    }
    for list in graph.objects(id, sh::IN) {
        set.add(sh::IN, expect_list(graph, list, sh::IN).map(Constraint::In));
    }

    for node in graph.objects(id, sh::SPARQL) {
        if is_deactivated(graph, node) {
            continue;
        }
        set.add(sh::SPARQL, sparql::compile_constraint(graph, node, path).map(Constraint::Sparql));
    }

    set.constraints
}

fn compile_closed(graph: &Graph, id: &Term) -> Result<Constraint, ShaclError> {
    let mut allowed = BTreeSet::new();
    if let Some(list) = graph.object(id, sh::IGNORED_PROPERTIES) {
        for item in expect_list(graph, list, sh::IGNORED_PROPERTIES)? {
            if let Term::Iri(iri) = item {
                allowed.insert(iri);
            }
        }
    }
    for property in graph.objects(id, sh::PROPERTY) {
        if let Some(Term::Iri(iri)) = graph.object(property, sh::PATH) {
            allowed.insert(iri.clone());
        }
    }
    Ok(Constraint::Closed { allowed })
}

pub(crate) fn is_deactivated(graph: &Graph, node: &Term) -> bool {
    graph
        .object(node, sh::DEACTIVATED)
        .and_then(|t| t.as_literal())
        .and_then(|l| l.as_bool())
        .unwrap_or(false)
}

fn compile_pattern(pattern: String, flags: Option<&str>) -> Result<Constraint, ShaclError> {
    let inline: String = flags
        .unwrap_or("")
        .chars()
        .filter(|c| matches!(c, 'i' | 'm' | 's' | 'x'))
        .collect();
    let source = if inline.is_empty() {
        pattern.clone()
    } else {
        format!("(?{}){}", inline, pattern)
    };
    let regex = Regex::new(&source)
        .map_err(|e| ShaclError::InvalidShape(format!("invalid sh:pattern {:?}: {}", pattern, e)))?;
    Ok(Constraint::Pattern { regex, pattern })
}

fn expect_iri(term: &Term, parameter: &str) -> Result<Iri, ShaclError> {
    term.as_iri()
        .cloned()
        .ok_or_else(|| ShaclError::InvalidShape(format!("{} expects an IRI, got {}", parameter, term)))
}

fn expect_literal(term: &Term, parameter: &str) -> Result<Literal, ShaclError> {
    term.as_literal()
        .cloned()
        .ok_or_else(|| ShaclError::InvalidShape(format!("{} expects a literal, got {}", parameter, term)))
}

fn expect_count(term: &Term, parameter: &str) -> Result<u64, ShaclError> {
    term.as_literal()
        .and_then(|l| l.as_u64())
        .ok_or_else(|| ShaclError::InvalidShape(format!("{} expects a non-negative integer, got {}", parameter, term)))
}

fn expect_list(graph: &Graph, head: &Term, parameter: &str) -> Result<Vec<Term>, ShaclError> {
    graph
        .list(head)
        .ok_or_else(|| ShaclError::InvalidShape(format!("{} expects an RDF list, got {}", parameter, head)))
}

fn inverse_pairs(graph: &Graph) -> HashMap<Iri, Vec<Iri>> {
    let mut pairs: HashMap<Iri, Vec<Iri>> = HashMap::new();
    for triple in graph.with_predicate(owl::INVERSE_OF) {
        if let (Term::Iri(p), Term::Iri(q)) = (&triple.subject, &triple.object) {
            pairs.entry(p.clone()).or_default().push(q.clone());
            pairs.entry(q.clone()).or_default().push(p.clone());
        }
    }
    for inverses in pairs.values_mut() {
        inverses.sort();
        inverses.dedup();
    }
    pairs
}
