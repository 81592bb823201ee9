//! RDF parsing on top of sophia
//!
//! Documents merged into an existing graph get their own blank node scope,
//! so merging graphs parsed from different documents never conflates their
//! blank nodes.

use crate::graph::Graph;
use crate::model::{Iri, Literal, Term, Triple};
use crate::vocab::xsd;
use crate::RdfError;

use sophia::api::parser::{QuadParser, TripleParser};
use sophia::api::quad::Quad as _;
use sophia::api::source::{QuadSource, StreamError, TripleSource};
use sophia::api::term::{Term as SophiaTerm, TermKind};
use sophia::api::triple::Triple as _;
use sophia::jsonld::parser::JsonLdParser;
use sophia::turtle::parser::turtle::TurtleParser;
use sophia::xml::parser::RdfXmlParser;

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Supported serialization formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RdfFormat {
    Turtle,
    NTriples,
    RdfXml,
    JsonLd,
}

impl RdfFormat {
    /// Detect a format from an HTTP media type (parameters are ignored).
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type.split(';').next()?.trim().to_ascii_lowercase();
        match essence.as_str() {
            "text/turtle" | "application/x-turtle" | "text/n3" => Some(RdfFormat::Turtle),
            "application/n-triples" => Some(RdfFormat::NTriples),
            "application/rdf+xml" | "application/xml" | "text/xml" => Some(RdfFormat::RdfXml),
            "application/ld+json" | "application/json" => Some(RdfFormat::JsonLd),
            _ => None,
        }
    }

    /// Detect a format from a file extension.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "ttl" | "turtle" | "n3" => Some(RdfFormat::Turtle),
            "nt" => Some(RdfFormat::NTriples),
            "rdf" | "owl" | "xml" => Some(RdfFormat::RdfXml),
            "jsonld" | "json" => Some(RdfFormat::JsonLd),
            _ => None,
        }
    }

    /// Detect a format from the last segment of a path or URL.
    pub fn from_location(location: &str) -> Option<Self> {
        let without_query = location.split(['?', '#']).next().unwrap_or(location);
        let segment = without_query.rsplit('/').next().unwrap_or(without_query);
        Path::new(segment)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RdfFormat::Turtle => "turtle",
            RdfFormat::NTriples => "n-triples",
            RdfFormat::RdfXml => "rdf/xml",
            RdfFormat::JsonLd => "json-ld",
        };
        f.write_str(name)
    }
}

static NEXT_SCOPE: AtomicU64 = AtomicU64::new(1);

/// Blank node label namespace for one parsed document
#[derive(Debug, Clone)]
struct BlankScope(Option<u64>);

impl BlankScope {
    fn next() -> Self {
        BlankScope(Some(NEXT_SCOPE.fetch_add(1, Ordering::Relaxed)))
    }

    fn label(&self, id: &str) -> String {
        match self.0 {
            Some(scope) => format!("d{}_{}", scope, id),
            None => id.to_string(),
        }
    }
}

/// Parse a document into a fresh graph.
///
/// Blank node labels are kept as the parser produced them, so parsing the
/// same text twice yields equal graphs. Use [`parse_into`] to merge several
/// documents into one graph.
pub fn parse(text: &str, format: RdfFormat, base: Option<&str>) -> Result<Graph, RdfError> {
    let mut graph = Graph::new();
    parse_with_scope(&mut graph, text, format, base, BlankScope(None))?;
    Ok(graph)
}

/// Parse a document and add its triples to `graph`, returning how many
/// triples were new. Blank nodes are relabelled into a fresh scope.
pub fn parse_into(
    graph: &mut Graph,
    text: &str,
    format: RdfFormat,
    base: Option<&str>,
) -> Result<usize, RdfError> {
    parse_with_scope(graph, text, format, base, BlankScope::next())
}

fn parse_with_scope(
    graph: &mut Graph,
    text: &str,
    format: RdfFormat,
    base: Option<&str>,
    scope: BlankScope,
) -> Result<usize, RdfError> {
    let before = graph.len();

    match format {
        // N-Triples is a subset of Turtle
        RdfFormat::Turtle | RdfFormat::NTriples => {
            let parser = TurtleParser { base: base_iri(base) };
            collect_triples(parser.parse_str(text), format, &scope, graph)?;
        }
        RdfFormat::RdfXml => {
            let parser = RdfXmlParser { base: base_iri(base) };
            collect_triples(parser.parse_str(text), format, &scope, graph)?;
        }
        RdfFormat::JsonLd => {
            let parser = JsonLdParser::new();
            let mut source = parser.parse_str(text);
            source
                .try_for_each_quad(|quad| {
                    // named graphs are merged into the default graph
                    let triple = convert_triple(quad.s(), quad.p(), quad.o(), &scope)?;
                    graph.insert(triple);
                    Ok::<(), RdfError>(())
                })
                .map_err(|e| stream_error(e, format))?;
        }
    }

    let added = graph.len() - before;
    debug!(format = %format, added, "parsed RDF document");
    Ok(added)
}

fn collect_triples<S: TripleSource>(
    mut source: S,
    format: RdfFormat,
    scope: &BlankScope,
    graph: &mut Graph,
) -> Result<(), RdfError> {
    source
        .try_for_each_triple(|triple| {
            let triple = convert_triple(triple.s(), triple.p(), triple.o(), scope)?;
            graph.insert(triple);
            Ok::<(), RdfError>(())
        })
        .map_err(|e| stream_error(e, format))
}

fn stream_error<E: std::error::Error>(error: StreamError<E, RdfError>, format: RdfFormat) -> RdfError {
    match error {
        StreamError::SourceError(e) => RdfError::Parse {
            format,
            message: e.to_string(),
        },
        StreamError::SinkError(e) => e,
    }
}

fn base_iri(base: Option<&str>) -> Option<sophia::iri::Iri<String>> {
    let base = base?;
    match sophia::iri::Iri::new(base.to_string()) {
        Ok(iri) => Some(iri),
        Err(_) => {
            debug!(base, "ignoring invalid base IRI");
            None
        }
    }
}

fn convert_triple<S, P, O>(s: S, p: P, o: O, scope: &BlankScope) -> Result<Triple, RdfError>
where
    S: SophiaTerm,
    P: SophiaTerm,
    O: SophiaTerm,
{
    let predicate = match convert_term(p, scope)? {
        Term::Iri(iri) => iri,
        other => return Err(RdfError::UnsupportedTerm(format!("predicate {}", other))),
    };

    Ok(Triple {
        subject: convert_term(s, scope)?,
        predicate,
        object: convert_term(o, scope)?,
    })
}

fn convert_term<T: SophiaTerm>(term: T, scope: &BlankScope) -> Result<Term, RdfError> {
    match term.kind() {
        TermKind::Iri => term
            .iri()
            .map(|iri| Term::Iri(Iri::new(iri.as_str())))
            .ok_or_else(|| RdfError::UnsupportedTerm("IRI without value".to_string())),
        TermKind::BlankNode => term
            .bnode_id()
            .map(|id| Term::BlankNode(scope.label(id.as_str())))
            .ok_or_else(|| RdfError::UnsupportedTerm("blank node without id".to_string())),
        TermKind::Literal => {
            let lexical = term
                .lexical_form()
                .map(|lex| lex.to_string())
                .ok_or_else(|| RdfError::UnsupportedTerm("literal without lexical form".to_string()))?;
            let literal = match term.language_tag() {
                Some(tag) => Literal::lang(lexical, tag.as_str()),
                None => {
                    let datatype = term
                        .datatype()
                        .map(|dt| Iri::new(dt.as_str()))
                        .unwrap_or_else(|| Iri::new(xsd::STRING));
                    Literal::typed(lexical, datatype)
                }
            };
            Ok(Term::Literal(literal))
        }
        TermKind::Triple => Err(RdfError::UnsupportedTerm("quoted triple".to_string())),
        TermKind::Variable => Err(RdfError::UnsupportedTerm("variable".to_string())),
    }
}
