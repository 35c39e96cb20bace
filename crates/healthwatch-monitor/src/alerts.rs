//! Notification type and the delivery channel trait.

#[cfg(test)]
#[path = "alerts_tests.rs"]
mod tests;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::MonitorError;
use crate::state::{Observation, StateValue};

/// A notification ready for delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Debounce key that fired, e.g. `DISK-/srv`.
    pub key: String,
    /// Value that fired.
    pub value: StateValue,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
    /// Timestamp.
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// Build the notification for an observation.
    pub fn from_observation(observation: &Observation) -> Self {
        Self {
            key: observation.key().to_string(),
            value: observation.value,
            subject: observation.subject(),
            body: observation.message(),
            timestamp: Utc::now(),
        }
    }
}

/// Alert channel trait.
#[async_trait]
pub trait AlertChannel: Send + Sync {
    /// Channel name.
    fn name(&self) -> &str;

    /// Deliver a notification.
    async fn send(&self, notification: &Notification) -> Result<(), MonitorError>;
}

/// Log channel (writes to tracing).
pub struct LogChannel;

#[async_trait]
impl AlertChannel for LogChannel {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, notification: &Notification) -> Result<(), MonitorError> {
        match notification.value {
            StateValue::Fine => info!(key = %notification.key, "{}: {}", notification.subject, notification.body),
            StateValue::Warn => warn!(key = %notification.key, "{}: {}", notification.subject, notification.body),
        }
        Ok(())
    }
}
