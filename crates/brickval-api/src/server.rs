//! HTTP server implementation

use axum::Router;
use brickval_shacl::{ShaclEngine, ShapesGraph};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{handlers::AppState, routes::create_router};

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// `host:port` as given; the host may be a name
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Validation API server
pub struct ValidationServer {
    config: ServerConfig,
    app_state: AppState,
    trace_project: Option<String>,
}

impl ValidationServer {
    pub fn new(config: ServerConfig, shapes: ShapesGraph, engine: Arc<dyn ShaclEngine>) -> Self {
        Self {
            config,
            app_state: AppState::new(shapes, engine),
            trace_project: None,
        }
    }

    /// Project id used to expand Cloud Trace ids in request spans
    pub fn with_trace_project(mut self, project: Option<String>) -> Self {
        self.trace_project = project;
        self
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Create the application router
    pub fn create_app(&self) -> Router {
        create_router(self.app_state.clone(), self.trace_project.clone())
    }

    /// Start the server
    pub async fn serve(self) -> anyhow::Result<()> {
        let app = self.create_app();
        let address = self.config.address();

        info!(
            "Starting validation server on {} with {} shapes",
            address,
            self.app_state.shapes.shape_count()
        );

        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, app).await.map_err(|e| {
            error!("Server error: {}", e);
            e.into()
        })
    }
}
