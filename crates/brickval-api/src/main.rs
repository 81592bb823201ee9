//! brickval service entry point

use anyhow::{Context, Result};
use brickval_api::lifecycle::{handle_signals, Lifecycle};
use brickval_api::{logging, Cli, ValidationServer};
use brickval_ontoenv::{load_shapes_graph, OntoEnv};
use brickval_shacl::{DefaultShaclEngine, ShapesGraph};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let logs = logging::init(cli.log_format())?;

    let lifecycle = Arc::new(Lifecycle::new(cli.mode));
    tokio::spawn(handle_signals(lifecycle, logs.clone()));

    let result = run(cli).await;
    if let Err(e) = &result {
        error!("Startup failed: {:#}", e);
    }
    logs.flush();
    result
}

async fn run(cli: Cli) -> Result<()> {
    let source = cli.ontology_source();
    info!(mode = %cli.mode, ontology = %source, "Loading shapes graph");

    let env_config = cli.env_config();
    let env = tokio::task::spawn_blocking(move || OntoEnv::new(env_config))
        .await?
        .context("failed to index ontology directories")?;

    let (graph, imports) = load_shapes_graph(&source, &env)
        .await
        .with_context(|| format!("failed to load shapes graph from {}", source))?;
    if !imports.unresolved.is_empty() {
        warn!(unresolved = ?imports.unresolved, "Some ontology imports could not be resolved");
    }
    info!(
        triples = graph.len(),
        imports = imports.resolved.len(),
        "Loaded ontology import closure"
    );

    let shapes = tokio::task::spawn_blocking(move || ShapesGraph::from_graph(graph))
        .await?
        .context("failed to compile shapes graph")?;

    let engine = Arc::new(DefaultShaclEngine::with_config(cli.validation_config()));
    ValidationServer::new(cli.server_config(), shapes, engine)
        .with_trace_project(cli.gcp_project.clone())
        .serve()
        .await
}
