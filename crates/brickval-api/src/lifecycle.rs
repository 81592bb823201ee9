//! Termination signal handling
//!
//! `Running` moves to `ShuttingDown` on the first termination signal of the
//! configured run mode. The transition logs the signal, flushes logging and
//! exits with status 0. In-flight requests are not drained.

use crate::config::RunMode;
use crate::logging::LogGuard;
use std::io;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Running,
    ShuttingDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Interrupt,
    Terminate,
}

impl Signal {
    pub fn name(&self) -> &'static str {
        match self {
            Signal::Interrupt => "SIGINT",
            Signal::Terminate => "SIGTERM",
        }
    }

    /// The signal that stops a process in `mode`
    pub fn for_mode(mode: RunMode) -> Self {
        match mode {
            RunMode::Local => Signal::Interrupt,
            RunMode::Managed => Signal::Terminate,
        }
    }
}

const RUNNING: u8 = 0;
const SHUTTING_DOWN: u8 = 1;

#[derive(Debug)]
pub struct Lifecycle {
    mode: RunMode,
    state: AtomicU8,
}

impl Lifecycle {
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            state: AtomicU8::new(RUNNING),
        }
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn state(&self) -> LifecycleState {
        match self.state.load(Ordering::SeqCst) {
            RUNNING => LifecycleState::Running,
            _ => LifecycleState::ShuttingDown,
        }
    }

    /// Move to `ShuttingDown`; false if shutdown had already begun
    pub fn begin_shutdown(&self) -> bool {
        self.state
            .compare_exchange(RUNNING, SHUTTING_DOWN, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Resolve on the next signal of this lifecycle's run mode
    pub async fn wait_for_signal(&self) -> io::Result<Signal> {
        let signal = Signal::for_mode(self.mode);
        match signal {
            Signal::Interrupt => tokio::signal::ctrl_c().await?,
            Signal::Terminate => wait_for_terminate().await?,
        }
        Ok(signal)
    }
}

#[cfg(unix)]
async fn wait_for_terminate() -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    signal(SignalKind::terminate())?.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_terminate() -> io::Result<()> {
    tokio::signal::ctrl_c().await
}

/// Wait for the termination signal, then log, flush and exit the process
pub async fn handle_signals(lifecycle: Arc<Lifecycle>, logs: LogGuard) {
    loop {
        let signal = match lifecycle.wait_for_signal().await {
            Ok(signal) => signal,
            Err(e) => {
                error!(error = %e, mode = %lifecycle.mode(), "cannot listen for termination signals");
                return;
            }
        };

        // a repeated signal while shutting down is ignored
        if lifecycle.begin_shutdown() {
            info!("Caught Signal {}", signal.name());
            logs.flush();
            std::process::exit(0);
        }
    }
}
