use anyhow::{Context, Result};
use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};

use crate::config::SmtpConfig;

/// Outbound SMTP notifications. Dispatch is fire-and-forget: a failed send is
/// logged and never fails the business operation that triggered it.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

/// Cloneable handle layered into the router. Holds nothing when SMTP is not
/// configured, in which case sends are silently skipped.
#[derive(Clone, Default)]
pub struct MailerHandle(pub Option<std::sync::Arc<Mailer>>);

impl Mailer {
    pub fn from_config(config: &SmtpConfig) -> Result<Mailer> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .context("Failed to build SMTP transport")?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        let sender = config
            .sender
            .parse::<Mailbox>()
            .context("SMTP_SENDER is not a valid mailbox")?;
        Ok(Mailer { transport, sender })
    }
}

impl MailerHandle {
    /// Queues a notification without awaiting delivery.
    pub fn send_notification(&self, to: &str, subject: &str, body: &str) {
        let mailer = match &self.0 {
            Some(mailer) => mailer.clone(),
            None => {
                tracing::debug!("SMTP not configured, skipping notification to {}", to);
                return;
            }
        };
        let to = match to.parse::<Mailbox>() {
            Ok(to) => to,
            Err(e) => {
                tracing::warn!("invalid notification recipient {}: {}", to, e);
                return;
            }
        };
        let message = Message::builder()
            .from(mailer.sender.clone())
            .to(to)
            .subject(subject)
            .body(body.to_string());
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("failed to build notification email: {}", e);
                return;
            }
        };
        tokio::spawn(async move {
            if let Err(e) = mailer.transport.send(message).await {
                tracing::warn!("failed to send notification email: {}", e);
            }
        });
    }
}
