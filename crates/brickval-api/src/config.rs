//! Command line and environment configuration

use crate::server::ServerConfig;
use brickval_ontoenv::{EnvConfig, OntologySource};
use brickval_shacl::ValidationConfig;
use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ONTOLOGY: &str = "https://github.com/BrickSchema/Brick/releases/download/nightly/Brick.ttl";

/// How the process is run, which decides the termination signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Interactive; stops on SIGINT
    Local,
    /// Orchestrated container; stops on SIGTERM
    Managed,
}

impl RunMode {
    pub fn default_host(&self) -> &'static str {
        match self {
            RunMode::Local => "127.0.0.1",
            RunMode::Managed => "0.0.0.0",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Local => f.write_str("local"),
            RunMode::Managed => f.write_str("managed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "brickval")]
#[command(about = "Validate Brick building models against the Brick SHACL shapes")]
#[command(version)]
pub struct Cli {
    /// Listen address; defaults to 127.0.0.1 locally and 0.0.0.0 when managed
    #[arg(long, env = "BRICKVAL_HOST")]
    pub host: Option<String>,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    #[arg(long, env = "RUN_MODE", value_enum, default_value_t = RunMode::Local)]
    pub mode: RunMode,

    /// Ontology document (URL or path) whose import closure becomes the shapes graph
    #[arg(long, env = "BRICK_ONTOLOGY", default_value = DEFAULT_ONTOLOGY)]
    pub ontology: String,

    /// Directory searched for local copies of imported ontologies
    #[arg(long = "import-dir", env = "ONTOLOGY_DIRS", value_delimiter = ',')]
    pub import_dirs: Vec<PathBuf>,

    /// Resolve imports from the import directories only
    #[arg(long, env = "ONTOLOGY_OFFLINE")]
    pub offline: bool,

    /// Log unresolvable imports instead of failing startup
    #[arg(long)]
    pub allow_missing_imports: bool,

    #[arg(long, default_value_t = 60)]
    pub fetch_timeout_secs: u64,

    /// Validate data graphs as submitted, without running inference first
    #[arg(long)]
    pub skip_inference: bool,

    /// Defaults to pretty locally and JSON when managed
    #[arg(long, env = "LOG_FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,

    /// Project id used to build Cloud Trace resource names
    #[arg(long, env = "GOOGLE_CLOUD_PROJECT")]
    pub gcp_project: Option<String>,
}

impl Cli {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self
                .host
                .clone()
                .unwrap_or_else(|| self.mode.default_host().to_string()),
            port: self.port,
        }
    }

    pub fn env_config(&self) -> EnvConfig {
        EnvConfig {
            search_dirs: self.import_dirs.clone(),
            offline: self.offline,
            strict: !self.allow_missing_imports,
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
        }
    }

    pub fn validation_config(&self) -> ValidationConfig {
        ValidationConfig {
            inference: !self.skip_inference,
            ..ValidationConfig::default()
        }
    }

    pub fn ontology_source(&self) -> OntologySource {
        OntologySource::parse(&self.ontology)
    }

    pub fn log_format(&self) -> LogFormat {
        self.log_format.unwrap_or(match self.mode {
            RunMode::Local => LogFormat::Pretty,
            RunMode::Managed => LogFormat::Json,
        })
    }
}
