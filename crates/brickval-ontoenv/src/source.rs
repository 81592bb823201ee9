//! Where an ontology document comes from

use brickval_core::RdfFormat;
use std::convert::Infallible;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OntologySource {
    Url(String),
    File(PathBuf),
}

impl OntologySource {
    /// `http(s)://` locations are URLs; `file://` and anything else are
    /// local paths.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            OntologySource::Url(location.to_string())
        } else if let Some(path) = location.strip_prefix("file://") {
            OntologySource::File(PathBuf::from(path))
        } else {
            OntologySource::File(PathBuf::from(location))
        }
    }

    /// Format suggested by the file extension
    pub fn format_hint(&self) -> Option<RdfFormat> {
        match self {
            OntologySource::Url(url) => RdfFormat::from_location(url),
            OntologySource::File(path) => path.to_str().and_then(RdfFormat::from_location),
        }
    }

    /// Base IRI used when parsing the document
    pub fn base_iri(&self) -> String {
        match self {
            OntologySource::Url(url) => url.clone(),
            OntologySource::File(path) => file_iri(path),
        }
    }
}

pub(crate) fn file_iri(path: &Path) -> String {
    let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    format!("file://{}", absolute.display())
}

impl FromStr for OntologySource {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for OntologySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OntologySource::Url(url) => f.write_str(url),
            OntologySource::File(path) => write!(f, "{}", path.display()),
        }
    }
}
