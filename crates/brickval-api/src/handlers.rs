//! API request handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use brickval_core::{parse, to_jsonld_string, RdfFormat};
use brickval_shacl::{ShaclEngine, ShapesGraph};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::models::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub shapes: Arc<ShapesGraph>,
    pub engine: Arc<dyn ShaclEngine>,
}

impl AppState {
    pub fn new(shapes: ShapesGraph, engine: Arc<dyn ShaclEngine>) -> Self {
        Self {
            shapes: Arc::new(shapes),
            engine,
        }
    }
}

/// Greeting handler
pub async fn hello() -> &'static str {
    info!(log_field = "custom-entry", arbitrary_field = "custom-entry");
    info!("Child logger with trace Id.");
    "Hello, World!"
}

/// Validate a JSON-LD data graph against the shapes graph
pub async fn validate(
    State(state): State<AppState>,
    request: Result<Json<ValidateRequest>, JsonRejection>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let Json(request) = request?;
    let document = request
        .data
        .as_jsonld()
        .ok_or_else(|| ApiError::InvalidBody("`data` must be a JSON-LD string, object or array".to_string()))?
        .into_owned();

    let response = tokio::task::spawn_blocking(move || validate_document(&state, &document))
        .await
        .map_err(|e| ApiError::Internal(format!("validation task failed: {}", e)))??;

    Ok(Json(response))
}

/// Parse and validate one document; runs on the blocking pool
pub fn validate_document(state: &AppState, document: &str) -> Result<ValidateResponse, ApiError> {
    let start = Instant::now();
    let data = parse(document, RdfFormat::JsonLd, None).map_err(ApiError::InvalidGraph)?;
    debug!(triples = data.len(), "parsed data graph");

    let outcome = state.engine.validate(&data, &state.shapes)?;
    let report = to_jsonld_string(&outcome.report_graph).map_err(|e| ApiError::Internal(e.to_string()))?;

    debug!(
        conforms = outcome.conforms,
        violations = outcome.report.results.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "validated data graph"
    );

    Ok(ValidateResponse {
        valid: outcome.conforms,
        report,
    })
}
