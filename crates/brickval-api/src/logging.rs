//! ロギング初期化
//!
//! Records go through a non-blocking writer to stderr. The returned
//! [`LogGuard`] owns the writer's worker; flushing it drains whatever is
//! still buffered, which must happen before the process exits.

use crate::config::LogFormat;
use std::sync::{Arc, Mutex, PoisonError};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Handle on the background log writer
#[derive(Clone)]
pub struct LogGuard {
    worker: Arc<Mutex<Option<WorkerGuard>>>,
}

impl LogGuard {
    fn new(worker: WorkerGuard) -> Self {
        Self {
            worker: Arc::new(Mutex::new(Some(worker))),
        }
    }

    /// Drain buffered records. Later records are dropped.
    pub fn flush(&self) {
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(worker);
    }

    pub fn is_flushed(&self) -> bool {
        self.worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
pub fn init(format: LogFormat) -> anyhow::Result<LogGuard> {
    let (writer, worker) = tracing_appender::non_blocking(std::io::stderr());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(writer).with_target(false))
            .try_init()?,
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(writer),
            )
            .try_init()?,
    }

    Ok(LogGuard::new(worker))
}
