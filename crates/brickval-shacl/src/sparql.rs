//! SHACL-SPARQL 制約とルール
//!
//! Prepares the queries of `sh:sparql` constraints and `sh:SPARQLRule`s:
//! prefixes come from `sh:prefixes` declarations and `$PATH` is replaced by
//! the surrounding property shape's path.

use crate::loader::PropertyPath;
use crate::vocab as sh;
use crate::ShaclError;
use brickval_core::{Graph, Literal, Term};
use brickval_sparql::{Bindings, DefaultSparqlParser, SparqlParser, SparqlQuery, Variable};
use regex::{Captures, Regex};

/// `sh:sparql` constraint with a SELECT query
#[derive(Debug, Clone)]
pub struct SparqlConstraint {
    /// The constraint node in the shapes graph
    pub node: Term,
    pub query: SparqlQuery,
    pub messages: Vec<Literal>,
}

pub(crate) fn compile_constraint(
    graph: &Graph,
    node: &Term,
    path: Option<&PropertyPath>,
) -> Result<SparqlConstraint, ShaclError> {
    let text = graph
        .object(node, sh::SELECT)
        .and_then(|t| t.as_literal())
        .ok_or_else(|| ShaclError::InvalidShape(format!("sh:sparql {} has no sh:select query", node)))?;

    let query = parse_query(graph, node, &text.lexical, path)?;
    if !query.is_select() {
        return Err(ShaclError::InvalidShape(format!("sh:select of {} is not a SELECT query", node)));
    }

    Ok(SparqlConstraint {
        node: node.clone(),
        query,
        messages: graph
            .objects(node, sh::MESSAGE)
            .into_iter()
            .filter_map(|t| t.as_literal().cloned())
            .collect(),
    })
}

/// Parse the query text attached to `node`
pub(crate) fn parse_query(
    graph: &Graph,
    node: &Term,
    text: &str,
    path: Option<&PropertyPath>,
) -> Result<SparqlQuery, ShaclError> {
    let text = substitute_path(text, path).map_err(|e| ShaclError::InvalidShape(format!("{}: {}", node, e)))?;

    DefaultSparqlParser::new()
        .with_prefixes(declared_prefixes(graph, node))
        .parse(&text)
        .map_err(|e| ShaclError::InvalidShape(format!("query of {}: {}", node, e)))
}

/// `sh:prefixes` / `sh:declare` pairs reachable from `node`
fn declared_prefixes(graph: &Graph, node: &Term) -> Vec<(String, String)> {
    let mut prefixes = Vec::new();
    for source in graph.objects(node, sh::PREFIXES) {
        for declaration in graph.objects(source, sh::DECLARE) {
            let prefix = graph.object(declaration, sh::PREFIX).and_then(|t| t.as_literal());
            let namespace = match graph.object(declaration, sh::NAMESPACE) {
                Some(Term::Literal(literal)) => Some(literal.lexical.clone()),
                Some(Term::Iri(iri)) => Some(iri.as_str().to_string()),
                _ => None,
            };
            if let (Some(prefix), Some(namespace)) = (prefix, namespace) {
                prefixes.push((prefix.lexical.clone(), namespace));
            }
        }
    }
    prefixes
}

fn substitute_path(text: &str, path: Option<&PropertyPath>) -> Result<String, String> {
    let placeholder = Regex::new(r"\$PATH\b").map_err(|e| e.to_string())?;
    if !placeholder.is_match(text) {
        return Ok(text.to_string());
    }
    match path {
        Some(path) => Ok(placeholder.replace_all(text, render_path(path).as_str()).into_owned()),
        None => Err("$PATH used outside a property shape".to_string()),
    }
}

/// SPARQL property path syntax for a compiled path
pub(crate) fn render_path(path: &PropertyPath) -> String {
    match path {
        PropertyPath::Predicate(iri) => format!("<{}>", iri),
        PropertyPath::Inverse(inner) => format!("^{}", grouped(inner)),
        PropertyPath::Sequence(steps) => {
            format!("({})", steps.iter().map(render_path).collect::<Vec<_>>().join("/"))
        }
        PropertyPath::Alternative(alternatives) => {
            format!("({})", alternatives.iter().map(render_path).collect::<Vec<_>>().join("|"))
        }
        PropertyPath::ZeroOrMore(inner) => format!("{}*", grouped(inner)),
        PropertyPath::OneOrMore(inner) => format!("{}+", grouped(inner)),
        PropertyPath::ZeroOrOne(inner) => format!("{}?", grouped(inner)),
    }
}

fn grouped(path: &PropertyPath) -> String {
    match path {
        PropertyPath::Predicate(_) => render_path(path),
        other => format!("({})", render_path(other)),
    }
}

/// Fill `{?var}` and `{$var}` placeholders from a solution row
pub(crate) fn fill_message(message: &Literal, row: &Bindings) -> Literal {
    let Ok(placeholder) = Regex::new(r"\{[?$]([A-Za-z_][A-Za-z0-9_]*)\}") else {
        return message.clone();
    };
    let lexical = placeholder.replace_all(&message.lexical, |captures: &Captures| {
        match row.get(&Variable::new(&captures[1])) {
            Some(Term::Literal(literal)) => literal.lexical.clone(),
            Some(Term::Iri(iri)) => iri.as_str().to_string(),
            Some(other) => other.to_string(),
            None => captures[0].to_string(),
        }
    });

    Literal {
        lexical: lexical.into_owned(),
        ..message.clone()
    }
}
