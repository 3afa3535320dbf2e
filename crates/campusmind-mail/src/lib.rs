// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Support email dispatch over SMTP.

use std::sync::Arc;

use async_trait::async_trait;
use campusmind_config::model::MailConfig;
use campusmind_core::error::CampusMindError;
use campusmind_core::traits::{MailAdapter, PluginAdapter};
use campusmind_core::types::{ActionOutcome, AdapterType, HealthStatus, SupportEmail};
use campusmind_core::validation;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, error, info};

/// Port that speaks TLS from the first byte instead of upgrading with STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

/// Shown when no SMTP relay is configured.
pub const MAIL_NOT_CONFIGURED: &str =
    "Email support is not configured. Please set mail.smtp_host to enable it.";

/// SMTP-backed [`MailAdapter`].
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpMailer {
    /// Builds a mailer from `[mail]`, or `Ok(None)` when no relay is configured.
    pub fn from_config(config: &MailConfig) -> Result<Option<Self>, CampusMindError> {
        let Some(host) = config.smtp_host.as_deref().filter(|h| !h.is_empty()) else {
            info!("no SMTP relay configured; support email disabled");
            return Ok(None);
        };

        let builder = if config.smtp_port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        }
        .map_err(|e| CampusMindError::Config(format!("invalid SMTP relay {host}: {e}")))?
        .port(config.smtp_port);

        let builder = match (&config.username, &config.password) {
            (Some(user), Some(pass)) => {
                builder.credentials(Credentials::new(user.clone(), pass.clone()))
            }
            _ => builder,
        };

        info!(host, port = config.smtp_port, "SMTP mailer initialized");
        Ok(Some(Self {
            transport: builder.build(),
            host: host.to_string(),
        }))
    }
}

/// Validates a support email and fills in the default sender.
pub fn prepare(email: &SupportEmail, default_from: &str) -> Result<SupportEmail, CampusMindError> {
    let from = email
        .from_email
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or(default_from);

    validation::collect([
        validation::email("toEmail", &email.to_email),
        validation::email("fromEmail", from),
        validation::non_blank("subject", &email.subject, "Subject is required."),
        validation::non_blank("body", &email.body, "Message body is required."),
    ])?;

    Ok(SupportEmail {
        to_email: email.to_email.trim().to_string(),
        from_email: Some(from.to_string()),
        subject: email.subject.trim().to_string(),
        body: email.body.clone(),
    })
}

fn mailbox(field: &str, address: &str) -> Result<Mailbox, CampusMindError> {
    address
        .parse()
        .map_err(|_| CampusMindError::validation(field, "Please enter a valid email address."))
}

fn build_message(email: &SupportEmail) -> Result<Message, CampusMindError> {
    let from = email
        .from_email
        .as_deref()
        .ok_or_else(|| CampusMindError::validation("fromEmail", "Sender is required."))?;
    Message::builder()
        .from(mailbox("fromEmail", from)?)
        .to(mailbox("toEmail", &email.to_email)?)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(email.body.clone())
        .map_err(|e| CampusMindError::Mail {
            message: format!("failed to build message: {e}"),
            source: Some(Box::new(e)),
        })
}

#[async_trait]
impl PluginAdapter for SmtpMailer {
    fn name(&self) -> &str {
        "smtp"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Mail
    }

    async fn health_check(&self) -> Result<HealthStatus, CampusMindError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(HealthStatus::Healthy),
            Ok(false) => Ok(HealthStatus::Degraded(format!("{} refused NOOP", self.host))),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), CampusMindError> {
        debug!("SMTP mailer shutting down");
        Ok(())
    }
}

#[async_trait]
impl MailAdapter for SmtpMailer {
    async fn send(&self, email: &SupportEmail) -> Result<(), CampusMindError> {
        let message = build_message(email)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| CampusMindError::Mail {
                message: format!("SMTP delivery failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        info!(to = %email.to_email, "support email sent");
        Ok(())
    }
}

/// Form-action entry point: validates, sends, and reports `{success, message}`.
pub async fn dispatch(
    mailer: Option<&Arc<dyn MailAdapter>>,
    email: &SupportEmail,
    default_from: &str,
) -> ActionOutcome {
    let prepared = match prepare(email, default_from) {
        Ok(prepared) => prepared,
        Err(e) => return ActionOutcome::failed(e.user_message()),
    };
    let Some(mailer) = mailer else {
        return ActionOutcome::failed(MAIL_NOT_CONFIGURED);
    };
    match mailer.send(&prepared).await {
        Ok(()) => ActionOutcome::ok("Email sent successfully!"),
        Err(e) => {
            error!(error = %e, "support email failed");
            ActionOutcome::failed("Failed to send email. Please try again later.")
        }
    }
}
