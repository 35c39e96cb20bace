//! SMTP email channel.

use async_trait::async_trait;
use healthwatch_config::{SmtpConfig, SmtpTls};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::error::MonitorError;

use super::alerts::{AlertChannel, Notification};

/// Email channel (SMTP) for the single configured monitor recipient.
pub struct EmailChannel {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailChannel {
    /// Create a new Email channel.
    pub fn new(config: &SmtpConfig) -> Result<Self, MonitorError> {
        let from: Mailbox = config
            .sender
            .parse()
            .map_err(|e| MonitorError::InvalidConfig(format!("smtp.sender: {}", e)))?;
        let to: Mailbox = config
            .recipient
            .parse()
            .map_err(|e| MonitorError::InvalidConfig(format!("smtp.recipient: {}", e)))?;

        let builder = match config.tls {
            SmtpTls::Starttls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| MonitorError::InvalidConfig(format!("smtp.host: {}", e)))?,
            SmtpTls::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| MonitorError::InvalidConfig(format!("smtp.host: {}", e)))?,
            SmtpTls::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.host.as_str())
            }
        };
        let mut builder = builder.port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            to,
        })
    }

    /// Build the plain-text message for a notification.
    pub fn build_message(&self, notification: &Notification) -> Result<Message, MonitorError> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(notification.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body.clone())
            .map_err(|e| MonitorError::AlertDelivery(format!("Failed to build email: {}", e)))
    }
}

#[async_trait]
impl AlertChannel for EmailChannel {
    fn name(&self) -> &str {
        "email"
    }

    async fn send(&self, notification: &Notification) -> Result<(), MonitorError> {
        let message = self.build_message(notification)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| MonitorError::AlertDelivery(format!("SMTP send failed: {}", e)))?;

        debug!(
            code = %response.code(),
            "Email sent to {}: {}",
            self.to, notification.subject
        );
        Ok(())
    }
}
