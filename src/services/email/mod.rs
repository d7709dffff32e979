//! SMTP delivery on top of [`EmailTemplate`].

use std::sync::Arc;
use std::time::Duration;

use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::EmailConfig;

pub mod templates;

pub use templates::{EmailTemplate, MonthlySummaryData};

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Email task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Sends product email over SMTP. With delivery disabled (the default, and
/// what tests run with) every send logs and reports success.
pub struct Mailer {
    config: EmailConfig,
}

impl Mailer {
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Deliver a message, blocking the caller until the SMTP exchange is
    /// done. The synchronous transport runs on the blocking pool.
    pub async fn send(&self, to: &str, template: &EmailTemplate) -> Result<(), EmailError> {
        let subject = template.subject();

        if !self.config.enabled {
            debug!(to = %to, subject = %subject, "Email delivery disabled, skipping send");
            return Ok(());
        }

        let message = self.build_message(to, template)?;
        let transport = self.build_transport()?;

        tokio::task::spawn_blocking(move || transport.send(&message)).await??;

        info!(to = %to, subject = %subject, "Email sent");
        Ok(())
    }

    /// Fire-and-forget delivery for notification mail that must not hold up
    /// the request that triggered it. Failures are logged and dropped.
    pub fn spawn_send(self: &Arc<Self>, to: String, template: EmailTemplate) {
        let mailer = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = mailer.send(&to, &template).await {
                warn!(error = %e, to = %to, "Failed to send email");
            }
        });
    }

    fn build_transport(&self) -> Result<SmtpTransport, EmailError> {
        let credentials = Credentials::new(
            self.config.username.clone(),
            self.config.password.clone(),
        );

        let transport = if self.config.use_starttls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
        } else {
            SmtpTransport::relay(&self.config.smtp_host)
        }?
        .port(self.config.smtp_port)
        .credentials(credentials)
        .timeout(Some(Duration::from_secs(self.config.timeout_secs)))
        .build();

        Ok(transport)
    }

    fn build_message(&self, to: &str, template: &EmailTemplate) -> Result<Message, EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email).parse()?;
        let to = to.parse()?;

        let body = MultiPart::alternative()
            .singlepart(
                SinglePart::builder()
                    .header(header::ContentType::TEXT_PLAIN)
                    .body(template.text_body()),
            )
            .singlepart(
                SinglePart::builder()
                    .header(header::ContentType::TEXT_HTML)
                    .body(template.html_body()),
            );

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(template.subject())
            .multipart(body)?;

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EmailConfig {
        EmailConfig {
            enabled: true,
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            username: "mailer@example.com".to_string(),
            password: "password".to_string(),
            from_name: "FinMate".to_string(),
            from_email: "noreply@example.com".to_string(),
            use_starttls: true,
            timeout_secs: 30,
        }
    }

    #[test]
    fn builds_multipart_message() {
        let mailer = Mailer::new(test_config());
        let template = EmailTemplate::Welcome {
            username: "sam".to_string(),
        };
        let result = mailer.build_message("sam@example.com", &template);
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_bad_recipient() {
        let mailer = Mailer::new(test_config());
        let template = EmailTemplate::Welcome {
            username: "sam".to_string(),
        };
        let result = mailer.build_message("not an address", &template);
        assert!(matches!(result, Err(EmailError::Address(_))));
    }

    #[tokio::test]
    async fn disabled_mailer_reports_success() {
        let config = EmailConfig {
            enabled: false,
            ..test_config()
        };
        let mailer = Mailer::new(config);
        let template = EmailTemplate::PasswordReset {
            username: "sam".to_string(),
        };
        assert!(mailer.send("sam@example.com", &template).await.is_ok());
    }
}
