//! RDF data model
//!
//! Terms and triples as owned, ordered values. Ordering is total so that
//! graphs and reports can be emitted deterministically.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::vocab::{rdf, xsd};

/// IRI wrapper for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Iri(pub String);

impl Iri {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Iri::new(s)
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// RDF literal
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    pub lexical: String,
    pub datatype: Iri,
    pub language: Option<String>,
}

impl Literal {
    /// Plain `xsd:string` literal
    pub fn string<S: Into<String>>(lexical: S) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: Iri::new(xsd::STRING),
            language: None,
        }
    }

    pub fn typed<S: Into<String>>(lexical: S, datatype: Iri) -> Self {
        Self {
            lexical: lexical.into(),
            datatype,
            language: None,
        }
    }

    /// Language-tagged string; the tag keeps the case it was written in
    pub fn lang<S: Into<String>, L: Into<String>>(lexical: S, language: L) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: Iri::new(rdf::LANG_STRING),
            language: Some(language.into()),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self::typed(value.to_string(), Iri::new(xsd::BOOLEAN))
    }

    pub fn integer(value: i64) -> Self {
        Self::typed(value.to_string(), Iri::new(xsd::INTEGER))
    }

    /// Numeric value of the literal, if its datatype is numeric and the
    /// lexical form parses.
    pub fn as_f64(&self) -> Option<f64> {
        if xsd::is_numeric(self.datatype.as_str()) {
            self.lexical.trim().parse::<f64>().ok()
        } else {
            None
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.lexical.trim().parse::<u64>().ok()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.lexical.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.lexical)?;
        if let Some(lang) = &self.language {
            write!(f, "@{}", lang)
        } else if self.datatype.as_str() != xsd::STRING {
            write!(f, "^^{}", self.datatype)
        } else {
            Ok(())
        }
    }
}

/// RDF term
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Term {
    Iri(Iri),
    BlankNode(String),
    Literal(Literal),
}

impl Term {
    pub fn iri<S: Into<String>>(s: S) -> Self {
        Term::Iri(Iri::new(s))
    }

    pub fn bnode<S: Into<String>>(label: S) -> Self {
        Term::BlankNode(label.into())
    }

    pub fn literal(lit: Literal) -> Self {
        Term::Literal(lit)
    }

    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// True when the term is the given IRI.
    pub fn is(&self, iri: &str) -> bool {
        matches!(self, Term::Iri(i) if i.as_str() == iri)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "{}", iri),
            Term::BlankNode(label) => write!(f, "_:{}", label),
            Term::Literal(lit) => write!(f, "{}", lit),
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

/// RDF Triple representation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Iri,
    pub object: Term,
}

impl Triple {
    pub fn new<S: Into<Term>, O: Into<Term>>(subject: S, predicate: Iri, object: O) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
