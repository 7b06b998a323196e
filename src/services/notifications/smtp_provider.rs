//! SMTP delivery via lettre's tokio transport.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::provider::{EmailMessage, NotificationProvider};
use crate::config::MailConfig;
use crate::error::{AppError, AppResult};

pub struct SmtpProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpProvider {
    /// Builds a STARTTLS transport from mail configuration.
    pub fn new(config: &MailConfig) -> AppResult<Self> {
        let from: Mailbox = if config.from_name.is_empty() {
            config.from_email.parse()
        } else {
            format!("{} <{}>", config.from_name, config.from_email).parse()
        }
        .map_err(|e| AppError::Validation {
            field: "mail.from_email".to_string(),
            reason: format!("Invalid sender address: {}", e),
        })?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| AppError::Internal {
                source: anyhow::anyhow!("Failed to build SMTP transport: {}", e),
            })?
            .port(config.smtp_port);

        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl NotificationProvider for SmtpProvider {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        let to: Mailbox = message.to.parse().map_err(|e| AppError::Validation {
            field: "to".to_string(),
            reason: format!("Invalid recipient address: {}", e),
        })?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(message.html_body.clone())
            .map_err(|e| AppError::Internal {
                source: anyhow::anyhow!("Failed to build email: {}", e),
            })?;

        self.transport
            .send(email)
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::anyhow!("SMTP send failed: {}", e),
            })?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}
