//! API route definitions

use axum::{
    http::Request,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::{MakeSpan, TraceLayer};
use tracing::{info_span, Span};

use crate::handlers::*;

pub const CLOUD_TRACE_HEADER: &str = "x-cloud-trace-context";

/// Create the main API router
pub fn create_router(state: AppState, trace_project: Option<String>) -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/validate", post(validate))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(CloudTraceSpan::new(trace_project)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Request span carrying the Cloud Trace id of the incoming request
#[derive(Debug, Clone, Default)]
pub struct CloudTraceSpan {
    project: Option<String>,
}

impl CloudTraceSpan {
    pub fn new(project: Option<String>) -> Self {
        Self { project }
    }
}

impl<B> MakeSpan<B> for CloudTraceSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let trace = request
            .headers()
            .get(CLOUD_TRACE_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| cloud_trace(value, self.project.as_deref()))
            .unwrap_or_default();

        info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            trace = %trace,
        )
    }
}

/// Trace resource name from an `X-Cloud-Trace-Context` value
/// (`TRACE_ID/SPAN_ID;o=OPTIONS`). Without a project only the id is kept.
pub fn cloud_trace(header: &str, project: Option<&str>) -> Option<String> {
    let trace_id = header.split(['/', ';']).next()?.trim();
    if trace_id.is_empty() {
        return None;
    }

    Some(match project {
        Some(project) => format!("projects/{}/traces/{}", project, trace_id),
        None => trace_id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloud_trace_with_project() {
        assert_eq!(
            cloud_trace("105445aa7843bc8bf206b12000100000/1;o=1", Some("my-project")).as_deref(),
            Some("projects/my-project/traces/105445aa7843bc8bf206b12000100000")
        );
    }

    #[test]
    fn test_cloud_trace_without_project() {
        assert_eq!(cloud_trace("abc123;o=0", None).as_deref(), Some("abc123"));
        assert_eq!(cloud_trace("", Some("p")), None);
        assert_eq!(cloud_trace("/1;o=1", Some("p")), None);
    }
}
