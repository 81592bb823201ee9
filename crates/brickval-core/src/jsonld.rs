//! JSON-LD serialization
//!
//! Graphs are written in expanded form: one node object per subject,
//! subjects in sorted order, so equal graphs serialize to equal strings.

use crate::graph::Graph;
use crate::model::{Literal, Term};
use crate::vocab::{rdf, xsd};
use crate::RdfError;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Convert a graph to an expanded JSON-LD document
pub fn to_jsonld(graph: &Graph) -> Value {
    let mut nodes: BTreeMap<&Term, Map<String, Value>> = BTreeMap::new();

    for triple in graph.iter() {
        let node = nodes.entry(&triple.subject).or_insert_with(|| {
            let mut node = Map::new();
            node.insert("@id".to_string(), Value::String(node_id(&triple.subject)));
            node
        });

        if triple.predicate.as_str() == rdf::TYPE && !triple.object.is_literal() {
            push_value(node, "@type", Value::String(node_id(&triple.object)));
        } else {
            push_value(node, triple.predicate.as_str(), object_value(&triple.object));
        }
    }

    let mut graph_nodes: Vec<Value> = nodes.into_values().map(Value::Object).collect();
    for node in graph_nodes.iter_mut() {
        sort_values(node);
    }
    Value::Array(graph_nodes)
}

/// Serialize a graph to a pretty-printed JSON-LD string
pub fn to_jsonld_string(graph: &Graph) -> Result<String, RdfError> {
    serde_json::to_string_pretty(&to_jsonld(graph)).map_err(RdfError::Serialize)
}

fn node_id(term: &Term) -> String {
    match term {
        Term::Iri(iri) => iri.as_str().to_string(),
        Term::BlankNode(label) => format!("_:{}", label),
        Term::Literal(lit) => lit.lexical.clone(),
    }
}

fn object_value(term: &Term) -> Value {
    match term {
        Term::Iri(_) | Term::BlankNode(_) => json!({ "@id": node_id(term) }),
        Term::Literal(lit) => literal_value(lit),
    }
}

fn literal_value(lit: &Literal) -> Value {
    let mut value = Map::new();
    value.insert("@value".to_string(), Value::String(lit.lexical.clone()));
    if let Some(lang) = &lit.language {
        value.insert("@language".to_string(), Value::String(lang.clone()));
    } else if lit.datatype.as_str() != xsd::STRING {
        value.insert("@type".to_string(), Value::String(lit.datatype.as_str().to_string()));
    }
    Value::Object(value)
}

fn push_value(node: &mut Map<String, Value>, key: &str, value: Value) {
    match node.entry(key.to_string()).or_insert_with(|| Value::Array(Vec::new())) {
        Value::Array(values) => values.push(value),
        other => *other = Value::Array(vec![value]),
    }
}

/// Value arrays follow insertion order; sort them for stable output.
fn sort_values(node: &mut Value) {
    if let Value::Object(map) = node {
        for value in map.values_mut() {
            if let Value::Array(values) = value {
                values.sort_by_key(|v| v.to_string());
            }
        }
    }
}
