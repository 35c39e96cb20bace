//! Monitor errors.

use thiserror::Error;

/// Monitor error types.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Request to a health source failed before a response arrived.
    #[error("Failed to fetch {resource}: {reason}")]
    Fetch { resource: String, reason: String },

    /// Health source answered with a non-success status.
    #[error("Health source returned {status} for {resource}")]
    HttpStatus { resource: String, status: u16 },

    /// Payload could not be interpreted.
    #[error("Invalid payload: {0}")]
    Parse(String),

    /// Alert delivery failed.
    #[error("Alert delivery failed: {0}")]
    AlertDelivery(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
