//! Signal handling for the daemon process.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::error::DaemonError;

/// Signal type for daemon control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonSignal {
    /// Graceful shutdown (SIGTERM, SIGINT).
    Shutdown,
}

impl std::fmt::Display for DaemonSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DaemonSignal::Shutdown => write!(f, "SHUTDOWN"),
        }
    }
}

/// Signal handler shared by the scheduler and the status server.
#[derive(Clone)]
pub struct SignalHandler {
    sender: broadcast::Sender<DaemonSignal>,
    shutdown_requested: Arc<AtomicBool>,
}

impl SignalHandler {
    /// Create a new signal handler.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self {
            sender,
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribe to signals.
    pub fn subscribe(&self) -> broadcast::Receiver<DaemonSignal> {
        self.sender.subscribe()
    }

    /// Send a signal.
    pub fn send(&self, signal: DaemonSignal) {
        debug!("Sending signal: {}", signal);

        match signal {
            DaemonSignal::Shutdown => {
                self.shutdown_requested.store(true, Ordering::SeqCst);
            }
        }

        let _ = self.sender.send(signal);
    }

    /// Request shutdown.
    pub fn request_shutdown(&self) {
        self.send(DaemonSignal::Shutdown);
    }

    /// Check if shutdown has been requested.
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }

    /// Resolve once shutdown has been requested.
    pub async fn wait_for_shutdown(&self) {
        let mut rx = self.subscribe();
        while !self.is_shutdown_requested() {
            match rx.recv().await {
                Ok(DaemonSignal::Shutdown) => break,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Set up OS signal handlers (Unix only).
    #[cfg(unix)]
    pub async fn setup_os_signals(&self) -> Result<(), DaemonError> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).map_err(|e| DaemonError::SignalSetup(e.to_string()))?;

        let sigterm_handler = self.clone();
        tokio::spawn(async move {
            while sigterm.recv().await.is_some() {
                info!("Received SIGTERM");
                sigterm_handler.request_shutdown();
            }
        });

        let mut sigint =
            signal(SignalKind::interrupt()).map_err(|e| DaemonError::SignalSetup(e.to_string()))?;

        let sigint_handler = self.clone();
        tokio::spawn(async move {
            while sigint.recv().await.is_some() {
                info!("Received SIGINT");
                sigint_handler.request_shutdown();
            }
        });

        info!("OS signal handlers installed (SIGTERM, SIGINT)");
        Ok(())
    }

    /// Set up OS signal handlers (non-Unix fallback).
    #[cfg(not(unix))]
    pub async fn setup_os_signals(&self) -> Result<(), DaemonError> {
        let handler = self.clone();

        // Only Ctrl+C is available on non-Unix
        tokio::spawn(async move {
            if let Ok(()) = tokio::signal::ctrl_c().await {
                info!("Received Ctrl+C");
                handler.request_shutdown();
            }
        });

        info!("OS signal handlers installed (Ctrl+C only)");
        Ok(())
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
