//! SHACL 語彙の IRI

pub const SH: &str = "http://www.w3.org/ns/shacl#";

pub const NODE_SHAPE: &str = "http://www.w3.org/ns/shacl#NodeShape";
pub const PROPERTY_SHAPE: &str = "http://www.w3.org/ns/shacl#PropertyShape";

// Targets
pub const TARGET_CLASS: &str = "http://www.w3.org/ns/shacl#targetClass";
pub const TARGET_NODE: &str = "http://www.w3.org/ns/shacl#targetNode";
pub const TARGET_SUBJECTS_OF: &str = "http://www.w3.org/ns/shacl#targetSubjectsOf";
pub const TARGET_OBJECTS_OF: &str = "http://www.w3.org/ns/shacl#targetObjectsOf";

// Paths
pub const PATH: &str = "http://www.w3.org/ns/shacl#path";
pub const INVERSE_PATH: &str = "http://www.w3.org/ns/shacl#inversePath";
pub const ALTERNATIVE_PATH: &str = "http://www.w3.org/ns/shacl#alternativePath";
pub const ZERO_OR_MORE_PATH: &str = "http://www.w3.org/ns/shacl#zeroOrMorePath";
pub const ONE_OR_MORE_PATH: &str = "http://www.w3.org/ns/shacl#oneOrMorePath";
pub const ZERO_OR_ONE_PATH: &str = "http://www.w3.org/ns/shacl#zeroOrOnePath";

// Shape attributes
pub const SEVERITY: &str = "http://www.w3.org/ns/shacl#severity";
pub const MESSAGE: &str = "http://www.w3.org/ns/shacl#message";
pub const DEACTIVATED: &str = "http://www.w3.org/ns/shacl#deactivated";
pub const VIOLATION: &str = "http://www.w3.org/ns/shacl#Violation";
pub const WARNING: &str = "http://www.w3.org/ns/shacl#Warning";
pub const INFO: &str = "http://www.w3.org/ns/shacl#Info";

// Constraint parameters
pub const CLASS: &str = "http://www.w3.org/ns/shacl#class";
pub const DATATYPE: &str = "http://www.w3.org/ns/shacl#datatype";
pub const NODE_KIND: &str = "http://www.w3.org/ns/shacl#nodeKind";
pub const MIN_COUNT: &str = "http://www.w3.org/ns/shacl#minCount";
pub const MAX_COUNT: &str = "http://www.w3.org/ns/shacl#maxCount";
pub const MIN_EXCLUSIVE: &str = "http://www.w3.org/ns/shacl#minExclusive";
pub const MIN_INCLUSIVE: &str = "http://www.w3.org/ns/shacl#minInclusive";
pub const MAX_EXCLUSIVE: &str = "http://www.w3.org/ns/shacl#maxExclusive";
pub const MAX_INCLUSIVE: &str = "http://www.w3.org/ns/shacl#maxInclusive";
pub const MIN_LENGTH: &str = "http://www.w3.org/ns/shacl#minLength";
pub const MAX_LENGTH: &str = "http://www.w3.org/ns/shacl#maxLength";
pub const PATTERN: &str = "http://www.w3.org/ns/shacl#pattern";
pub const FLAGS: &str = "http://www.w3.org/ns/shacl#flags";
pub const LANGUAGE_IN: &str = "http://www.w3.org/ns/shacl#languageIn";
pub const UNIQUE_LANG: &str = "http://www.w3.org/ns/shacl#uniqueLang";
pub const EQUALS: &str = "http://www.w3.org/ns/shacl#equals";
pub const DISJOINT: &str = "http://www.w3.org/ns/shacl#disjoint";
pub const LESS_THAN: &str = "http://www.w3.org/ns/shacl#lessThan";
pub const LESS_THAN_OR_EQUALS: &str = "http://www.w3.org/ns/shacl#lessThanOrEquals";
pub const NOT: &str = "http://www.w3.org/ns/shacl#not";
pub const AND: &str = "http://www.w3.org/ns/shacl#and";
pub const OR: &str = "http://www.w3.org/ns/shacl#or";
pub const XONE: &str = "http://www.w3.org/ns/shacl#xone";
pub const NODE: &str = "http://www.w3.org/ns/shacl#node";
pub const PROPERTY: &str = "http://www.w3.org/ns/shacl#property";
pub const QUALIFIED_VALUE_SHAPE: &str = "http://www.w3.org/ns/shacl#qualifiedValueShape";
pub const QUALIFIED_MIN_COUNT: &str = "http://www.w3.org/ns/shacl#qualifiedMinCount";
pub const QUALIFIED_MAX_COUNT: &str = "http://www.w3.org/ns/shacl#qualifiedMaxCount";
pub const CLOSED: &str = "http://www.w3.org/ns/shacl#closed";
pub const IGNORED_PROPERTIES: &str = "http://www.w3.org/ns/shacl#ignoredProperties";
pub const HAS_VALUE: &str = "http://www.w3.org/ns/shacl#hasValue";
pub const IN: &str = "http://www.w3.org/ns/shacl#in";
pub const SPARQL: &str = "http://www.w3.org/ns/shacl#sparql";

// SHACL-SPARQL
pub const SELECT: &str = "http://www.w3.org/ns/shacl#select";
pub const CONSTRUCT: &str = "http://www.w3.org/ns/shacl#construct";
pub const PREFIXES: &str = "http://www.w3.org/ns/shacl#prefixes";
pub const DECLARE: &str = "http://www.w3.org/ns/shacl#declare";
pub const PREFIX: &str = "http://www.w3.org/ns/shacl#prefix";
pub const NAMESPACE: &str = "http://www.w3.org/ns/shacl#namespace";

// Node kinds
pub const BLANK_NODE: &str = "http://www.w3.org/ns/shacl#BlankNode";
pub const IRI: &str = "http://www.w3.org/ns/shacl#IRI";
pub const LITERAL: &str = "http://www.w3.org/ns/shacl#Literal";
pub const BLANK_NODE_OR_IRI: &str = "http://www.w3.org/ns/shacl#BlankNodeOrIRI";
pub const BLANK_NODE_OR_LITERAL: &str = "http://www.w3.org/ns/shacl#BlankNodeOrLiteral";
pub const IRI_OR_LITERAL: &str = "http://www.w3.org/ns/shacl#IRIOrLiteral";

// Rules
pub const RULE: &str = "http://www.w3.org/ns/shacl#rule";
pub const TRIPLE_RULE: &str = "http://www.w3.org/ns/shacl#TripleRule";
pub const SPARQL_RULE: &str = "http://www.w3.org/ns/shacl#SPARQLRule";
pub const SUBJECT: &str = "http://www.w3.org/ns/shacl#subject";
pub const PREDICATE: &str = "http://www.w3.org/ns/shacl#predicate";
pub const OBJECT: &str = "http://www.w3.org/ns/shacl#object";
pub const THIS: &str = "http://www.w3.org/ns/shacl#this";
pub const CONDITION: &str = "http://www.w3.org/ns/shacl#condition";

// Validation report
pub const VALIDATION_REPORT: &str = "http://www.w3.org/ns/shacl#ValidationReport";
pub const VALIDATION_RESULT: &str = "http://www.w3.org/ns/shacl#ValidationResult";
pub const CONFORMS: &str = "http://www.w3.org/ns/shacl#conforms";
pub const RESULT: &str = "http://www.w3.org/ns/shacl#result";
pub const FOCUS_NODE: &str = "http://www.w3.org/ns/shacl#focusNode";
pub const RESULT_PATH: &str = "http://www.w3.org/ns/shacl#resultPath";
pub const VALUE: &str = "http://www.w3.org/ns/shacl#value";
pub const SOURCE_SHAPE: &str = "http://www.w3.org/ns/shacl#sourceShape";
pub const SOURCE_CONSTRAINT_COMPONENT: &str = "http://www.w3.org/ns/shacl#sourceConstraintComponent";
pub const RESULT_SEVERITY: &str = "http://www.w3.org/ns/shacl#resultSeverity";
pub const RESULT_MESSAGE: &str = "http://www.w3.org/ns/shacl#resultMessage";

/// Constraint component IRI for a short component name such as `MinCount`
pub fn component(name: &str) -> String {
    format!("{}{}ConstraintComponent", SH, name)
}
