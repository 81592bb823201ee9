//! # brickval API
//!
//! Brick SHACL 検証の Web API インターフェース
//! Serves a greeting on `/` and validates JSON-LD data graphs on `/validate`
//! against a shapes graph built once at startup.

pub mod config;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod logging;
pub mod models;
pub mod routes;
pub mod server;

pub use config::{Cli, LogFormat, RunMode};
pub use error::ApiError;
pub use handlers::*;
pub use lifecycle::{Lifecycle, LifecycleState, Signal};
pub use logging::LogGuard;
pub use models::*;
pub use routes::*;
pub use server::*;
