// API integration tests for brickval-api

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use brickval_api::{create_router, hello, AppState, ErrorResponse, ValidateResponse};
use brickval_core::{parse, Graph, RdfFormat};
use brickval_shacl::{DefaultShaclEngine, ShaclEngine, ShaclError, ShapesGraph, ValidationOutcome};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const SHAPES: &str = r#"
@prefix sh: <http://www.w3.org/ns/shacl#> .
@prefix ex: <http://example.org/> .

ex:PointShape a sh:NodeShape ;
    sh:targetClass ex:Point ;
    sh:property [
        sh:path ex:hasUnit ;
        sh:minCount 1 ;
        sh:class ex:Unit ;
    ] .
"#;

const REPORT_RESULT: &str = "\"http://www.w3.org/ns/shacl#result\"";

fn shapes() -> ShapesGraph {
    let graph = parse(SHAPES, RdfFormat::Turtle, None).unwrap();
    ShapesGraph::from_graph(graph).unwrap()
}

fn app() -> Router {
    create_router(AppState::new(shapes(), Arc::new(DefaultShaclEngine::new())), None)
}

fn point(with_unit: bool) -> Value {
    let mut point = json!({
        "@id": "ex:p1",
        "@type": "ex:Point",
    });
    if with_unit {
        point["ex:hasUnit"] = json!({ "@id": "ex:DEG_C" });
    }
    json!({
        "@context": { "ex": "http://example.org/" },
        "@graph": [
            point,
            { "@id": "ex:DEG_C", "@type": "ex:Unit" }
        ]
    })
}

async fn post_validate(app: &Router, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/validate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn as_string_payload(document: &Value) -> String {
    json!({ "data": document.to_string() }).to_string()
}

#[tokio::test]
async fn test_hello_endpoint() {
    let app = app();
    for _ in 0..2 {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Hello, World!");
    }

    assert_eq!(hello().await, "Hello, World!");
}

#[tokio::test]
async fn test_valid_graph() {
    let app = app();
    let (status, body) = post_validate(&app, as_string_payload(&point(true))).await;
    assert_eq!(status, StatusCode::OK);

    let response: ValidateResponse = serde_json::from_value(body).unwrap();
    assert!(response.valid);
    assert!(response.report.contains("http://www.w3.org/ns/shacl#ValidationReport"));
    assert!(!response.report.contains(REPORT_RESULT));
}

#[tokio::test]
async fn test_invalid_graph() {
    let app = app();
    let (status, body) = post_validate(&app, as_string_payload(&point(false))).await;
    assert_eq!(status, StatusCode::OK);

    let response: ValidateResponse = serde_json::from_value(body).unwrap();
    assert!(!response.valid);
    assert!(response.report.contains(REPORT_RESULT));
    assert!(response.report.contains("http://www.w3.org/ns/shacl#MinCountConstraintComponent"));
    assert!(response.report.contains("http://example.org/p1"));

    // the report is itself a JSON-LD document
    let report: Value = serde_json::from_str(&response.report).unwrap();
    assert!(report.is_array());
}

#[tokio::test]
async fn test_embedded_json_document() {
    let app = app();
    let (status, body) = post_validate(&app, json!({ "data": point(false) }).to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], json!(false));
}

#[tokio::test]
async fn test_empty_graph_is_valid() {
    let app = app();
    let document = json!({
        "@context": { "ex": "http://example.org/" },
        "@graph": []
    });
    let (status, body) = post_validate(&app, as_string_payload(&document)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], json!(true));
}

#[tokio::test]
async fn test_missing_data_field() {
    let app = app();
    let (status, body) = post_validate(&app, json!({ "graph": "{}" }).to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let error: ErrorResponse = serde_json::from_value(body).unwrap();
    assert_eq!(error.error, "invalid_body");
    assert!(!error.message.is_empty());
}

#[tokio::test]
async fn test_body_is_not_json() {
    let app = app();
    let (status, body) = post_validate(&app, "data=not-json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid_body"));
}

#[tokio::test]
async fn test_scalar_data_field() {
    let app = app();
    let (status, body) = post_validate(&app, json!({ "data": 42 }).to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid_body"));
}

#[tokio::test]
async fn test_data_is_not_jsonld() {
    let app = app();
    let (status, body) = post_validate(&app, json!({ "data": "this is not JSON-LD" }).to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid_graph"));

    // the service keeps serving after a rejected request
    let (status, body) = post_validate(&app, as_string_payload(&point(true))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], json!(true));
}

#[tokio::test]
async fn test_repeated_validation_is_deterministic() {
    let app = app();
    let payload = as_string_payload(&point(false));

    let (_, first) = post_validate(&app, payload.clone()).await;
    let (_, second) = post_validate(&app, payload).await;
    assert_eq!(first, second);
}

const SPARQL_SHAPES: &str = r#"
@prefix sh: <http://www.w3.org/ns/shacl#> .
@prefix ex: <http://example.org/> .

ex:PointUnitShape a sh:NodeShape ;
    sh:targetClass ex:Point ;
    sh:sparql [
        sh:message "Point has no unit" ;
        sh:select "SELECT $this WHERE { FILTER NOT EXISTS { $this <http://example.org/hasUnit> ?unit } }" ;
    ] .
"#;

#[tokio::test]
async fn test_sparql_constraint_controls_validity() {
    let graph = parse(SPARQL_SHAPES, RdfFormat::Turtle, None).unwrap();
    let shapes = ShapesGraph::from_graph(graph).unwrap();
    let app = create_router(AppState::new(shapes, Arc::new(DefaultShaclEngine::new())), None);

    let (status, body) = post_validate(&app, as_string_payload(&point(false))).await;
    assert_eq!(status, StatusCode::OK);
    let response: ValidateResponse = serde_json::from_value(body).unwrap();
    assert!(!response.valid);
    assert!(response.report.contains("http://www.w3.org/ns/shacl#SPARQLConstraintComponent"));
    assert!(response.report.contains("Point has no unit"));

    let (_, body) = post_validate(&app, as_string_payload(&point(true))).await;
    assert_eq!(body["valid"], json!(true));
}

/// Engine that always fails
struct BrokenEngine;

impl ShaclEngine for BrokenEngine {
    fn validate(&self, _data: &Graph, _shapes: &ShapesGraph) -> Result<ValidationOutcome, ShaclError> {
        Err(ShaclError::ValidationError("engine unavailable".to_string()))
    }

    fn infer(&self, data: &Graph, _shapes: &ShapesGraph) -> Result<Graph, ShaclError> {
        Ok(data.clone())
    }
}

#[tokio::test]
async fn test_engine_failure_is_server_error() {
    let app = create_router(AppState::new(shapes(), Arc::new(BrokenEngine)), Some("my-project".into()));
    let (status, body) = post_validate(&app, as_string_payload(&point(true))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let error: ErrorResponse = serde_json::from_value(body).unwrap();
    assert_eq!(error.error, "validation_failed");
    assert!(error.message.contains("engine unavailable"));
}
