//! Alert manager for dispatching notifications to channels.

use healthwatch_config::SmtpConfig;
use tracing::{error, info};

use crate::error::MonitorError;

use super::alert_channels::EmailChannel;
use super::alerts::{AlertChannel, LogChannel, Notification};

/// Alert manager.
///
/// Every notification goes to the operational log, and to email when SMTP is
/// configured.
pub struct AlertManager {
    channels: Vec<Box<dyn AlertChannel>>,
}

impl AlertManager {
    /// Create a manager with only the log channel.
    pub fn new() -> Self {
        Self {
            channels: vec![Box::new(LogChannel)],
        }
    }

    /// Create from config.
    pub fn from_config(smtp: Option<&SmtpConfig>) -> Result<Self, MonitorError> {
        let mut manager = Self::new();

        if let Some(smtp) = smtp {
            info!(host = %smtp.host, port = smtp.port, "Adding Email alert channel");
            manager.add_channel(Box::new(EmailChannel::new(smtp)?));
        }

        Ok(manager)
    }

    /// Add a channel.
    pub fn add_channel(&mut self, channel: Box<dyn AlertChannel>) {
        self.channels.push(channel);
    }

    /// Get list of channel names.
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// Send a notification to all channels.
    pub async fn send(&self, notification: &Notification) -> Vec<MonitorError> {
        let mut errors = Vec::new();

        for channel in &self.channels {
            if let Err(e) = channel.send(notification).await {
                error!("Failed to send notification via {}: {}", channel.name(), e);
                errors.push(e);
            }
        }

        errors
    }
}

impl Default for AlertManager {
    fn default() -> Self {
        Self::new()
    }
}
