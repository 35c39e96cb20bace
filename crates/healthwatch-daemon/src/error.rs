//! Daemon-related errors.

use thiserror::Error;

/// Errors that can occur during daemon operations.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Failed to set up signal handlers.
    #[error("Failed to set up signal handlers: {0}")]
    SignalSetup(String),

    /// Scheduler misconfiguration.
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),
}
