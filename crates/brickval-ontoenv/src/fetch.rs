//! HTTP retrieval of ontology documents

use crate::OntoEnvError;
use async_trait::async_trait;
use brickval_core::RdfFormat;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, instrument};

/// Preference order sent in the `Accept` header
const ACCEPT_RDF: &str = "text/turtle, application/rdf+xml;q=0.9, application/ld+json;q=0.8, \
                          application/n-triples;q=0.7, */*;q=0.1";

const USER_AGENT: &str = concat!("brickval/", env!("CARGO_PKG_VERSION"));

/// A fetched document and the format it should be parsed as
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// Final location after redirects
    pub location: String,
    pub text: String,
    pub format: RdfFormat,
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, OntoEnvError>;
}

/// reqwest based fetcher
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, OntoEnvError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| OntoEnvError::Http {
                url: String::new(),
                source,
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, OntoEnvError> {
        let http_error = |source| OntoEnvError::Http {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .header(ACCEPT, ACCEPT_RDF)
            .send()
            .await
            .map_err(http_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(OntoEnvError::NotFound(url.to_string()));
        }
        let response = response.error_for_status().map_err(http_error)?;

        let location = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let format = detect_format(content_type.as_deref(), &location);
        let text = response.text().await.map_err(http_error)?;

        debug!(%location, %format, bytes = text.len(), "fetched ontology document");
        Ok(FetchedDocument { location, text, format })
    }
}

/// Content type first, then the URL extension, then Turtle
pub(crate) fn detect_format(content_type: Option<&str>, url: &str) -> RdfFormat {
    content_type
        .and_then(RdfFormat::from_media_type)
        .or_else(|| RdfFormat::from_location(url))
        .unwrap_or(RdfFormat::Turtle)
}
