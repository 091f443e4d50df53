//! On-call notification over SMTP.
//!
//! Renders the incident into a plain-text mail, with caller-supplied
//! subject, body and recipient overrides taking precedence over the
//! rendered defaults. Outcomes come back as `email_*` status strings.

use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// SMTP relay settings for on-call notifications.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Upgrade the connection with STARTTLS. Plaintext otherwise.
    pub use_tls: bool,
    /// Sender address, also the SMTP login user.
    pub sender: String,
    pub sender_password: String,
    /// Recipient used when the request does not name one.
    pub default_recipient: String,
}

/// Incident facts for the notification plus optional overrides. Blank
/// override fields fall back to the rendered defaults.
#[derive(Debug, Clone, Default)]
pub struct NotificationRequest {
    pub service: String,
    pub environment: String,
    pub severity: String,
    pub summary: String,
    pub recommended_actions: String,
    pub email_subject: String,
    pub email_body: String,
    pub recipient_email: String,
}

fn default_subject(req: &NotificationRequest) -> String {
    format!(
        "[{}] Incident - {} ({})",
        req.severity, req.service, req.environment
    )
}

fn default_body(req: &NotificationRequest) -> String {
    format!(
        "Service: {}\nEnvironment: {}\nSeverity: {}\nSummary: {}\n\nRecommended Actions:\n{}\n",
        req.service, req.environment, req.severity, req.summary, req.recommended_actions
    )
}

fn pick(custom: &str, fallback: String) -> String {
    let trimmed = custom.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed.to_string()
    }
}

fn build_message(
    sender: &str,
    recipient: &str,
    subject: &str,
    body: String,
) -> Result<Message, Box<dyn std::error::Error + Send + Sync>> {
    Ok(Message::builder()
        .from(sender.parse()?)
        .to(recipient.parse()?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body)?)
}

fn build_transport(
    config: &EmailConfig,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, lettre::transport::smtp::Error> {
    let credentials = Credentials::new(config.sender.clone(), config.sender_password.clone());
    let builder = if config.use_tls {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
    };
    Ok(builder
        .port(config.smtp_port)
        .credentials(credentials)
        .timeout(Some(SEND_TIMEOUT))
        .build())
}

/// Send the incident notification to the on-call engineer. Returns a
/// status string on every path.
pub async fn send_incident_email(config: &EmailConfig, req: &NotificationRequest) -> String {
    let subject = pick(&req.email_subject, default_subject(req));
    let body = pick(&req.email_body, default_body(req));
    let recipient = pick(&req.recipient_email, config.default_recipient.clone());

    let message = match build_message(&config.sender, &recipient, &subject, body) {
        Ok(message) => message,
        Err(e) => {
            error!(error = %e, "Could not assemble notification message");
            return format!("email_failed: {e}");
        }
    };

    let transport = match build_transport(config) {
        Ok(transport) => transport,
        Err(e) => {
            error!(error = %e, "Could not build SMTP transport");
            return format!("email_failed: {e}");
        }
    };

    match transport.send(message).await {
        Ok(_) => {
            info!(recipient = %recipient, "Incident notification sent");
            format!("email_sent: {recipient}")
        }
        Err(e) => {
            error!(error = %e, recipient = %recipient, "Incident notification failed");
            format!("email_failed: {e}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> NotificationRequest {
        NotificationRequest {
            service: "checkout".to_string(),
            environment: "production".to_string(),
            severity: "SEV2".to_string(),
            summary: "latency regression".to_string(),
            recommended_actions: "scale out the pool".to_string(),
            ..NotificationRequest::default()
        }
    }

    #[test]
    fn default_subject_folds_severity_service_environment() {
        assert_eq!(
            default_subject(&sample_request()),
            "[SEV2] Incident - checkout (production)"
        );
    }

    #[test]
    fn default_body_lists_facts_then_actions() {
        let body = default_body(&sample_request());
        assert!(body.starts_with("Service: checkout\n"));
        assert!(body.contains("Summary: latency regression\n"));
        assert!(body.ends_with("Recommended Actions:\nscale out the pool\n"));
    }

    #[test]
    fn blank_overrides_fall_back_to_defaults() {
        assert_eq!(pick("   ", "fallback".to_string()), "fallback");
        assert_eq!(pick("", "fallback".to_string()), "fallback");
        assert_eq!(pick(" custom ", "fallback".to_string()), "custom");
    }

    #[test]
    fn message_assembly_rejects_invalid_addresses() {
        let result = build_message("not-an-address", "oncall@example.test", "s", "b".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn message_assembly_accepts_plain_addresses() {
        let result = build_message(
            "agent@example.test",
            "oncall@example.test",
            "subject",
            "body".to_string(),
        );
        assert!(result.is_ok());
    }
}
