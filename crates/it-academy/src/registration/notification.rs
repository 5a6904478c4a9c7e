use std::fmt::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::domain::{FieldName, RegistrationDraft};
use crate::config::NotificationConfig;

/// External collaborator told about every completed registration.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send_registration_notification(
        &self,
        draft: &RegistrationDraft,
    ) -> Result<(), NotificationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
    #[error("notification endpoint rejected the message with status {status}")]
    Rejected { status: u16 },
    #[error("notification client could not be built: {0}")]
    Client(#[source] reqwest::Error),
}

/// Plain-text e-mail produced for a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// The admissions alert and the applicant confirmation sent for one registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationNotification {
    pub submitted_at: DateTime<Utc>,
    pub admin: EmailMessage,
    pub applicant: EmailMessage,
}

impl RegistrationNotification {
    pub fn compose(
        draft: &RegistrationDraft,
        admin_email: &str,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let course = draft
            .course_interest
            .map(|course| course.label())
            .unwrap_or("a course");
        let summary = field_summary(draft);
        let timestamp = submitted_at.format("%Y-%m-%d %H:%M UTC");

        let mut admin_body = String::new();
        writeln!(admin_body, "A new registration was submitted on {timestamp}.")
            .expect("admin intro");
        admin_body.push('\n');
        admin_body.push_str(&summary);

        let mut applicant_body = String::new();
        writeln!(applicant_body, "Hi {},", draft.full_name.trim()).expect("greeting");
        applicant_body.push('\n');
        writeln!(
            applicant_body,
            "Thank you for registering your interest in {course} at IT Academy. Our admissions team will contact you shortly."
        )
        .expect("thank you");
        applicant_body.push('\n');
        writeln!(applicant_body, "Here is what you submitted:").expect("summary heading");
        applicant_body.push_str(&summary);

        Self {
            submitted_at,
            admin: EmailMessage {
                to: admin_email.to_string(),
                subject: format!("New registration: {} ({course})", draft.full_name.trim()),
                body: admin_body,
            },
            applicant: EmailMessage {
                to: draft.email.clone(),
                subject: "Your IT Academy registration".to_string(),
                body: applicant_body,
            },
        }
    }
}

fn field_summary(draft: &RegistrationDraft) -> String {
    let mut summary = String::new();
    for field in FieldName::ALL {
        let value = draft.display_value(field);
        let value = if value.is_empty() { "-" } else { value.as_str() };
        writeln!(summary, "- {}: {}", field.label(), value).expect("summary line");
    }
    summary
}

/// Writes the composed messages to the log instead of delivering them.
#[derive(Debug, Clone)]
pub struct LoggingNotificationSender {
    admin_email: String,
}

impl LoggingNotificationSender {
    pub fn new(admin_email: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
        }
    }
}

#[async_trait]
impl NotificationSender for LoggingNotificationSender {
    async fn send_registration_notification(
        &self,
        draft: &RegistrationDraft,
    ) -> Result<(), NotificationError> {
        let notification = RegistrationNotification::compose(draft, &self.admin_email, Utc::now());
        info!(
            admin = %notification.admin.to,
            applicant = %notification.applicant.to,
            subject = %notification.admin.subject,
            "registration notification composed (delivery disabled)"
        );
        Ok(())
    }
}

/// Posts the composed messages as JSON to a mail relay webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotificationSender {
    http: reqwest::Client,
    url: String,
    admin_email: String,
}

impl WebhookNotificationSender {
    pub fn new(
        url: impl Into<String>,
        admin_email: impl Into<String>,
    ) -> Result<Self, NotificationError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(NotificationError::Client)?;
        Ok(Self {
            http,
            url: url.into(),
            admin_email: admin_email.into(),
        })
    }
}

#[async_trait]
impl NotificationSender for WebhookNotificationSender {
    async fn send_registration_notification(
        &self,
        draft: &RegistrationDraft,
    ) -> Result<(), NotificationError> {
        let notification = RegistrationNotification::compose(draft, &self.admin_email, Utc::now());
        let response = self
            .http
            .post(&self.url)
            .json(&notification)
            .send()
            .await
            .map_err(|err| NotificationError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
            });
        }

        info!(url = %self.url, applicant = %notification.applicant.to, "registration notification delivered");
        Ok(())
    }
}

/// Sender selected from configuration: the webhook when a URL is set, logging otherwise.
#[derive(Debug, Clone)]
pub enum ConfiguredSender {
    Logging(LoggingNotificationSender),
    Webhook(WebhookNotificationSender),
}

impl ConfiguredSender {
    pub fn from_config(config: &NotificationConfig) -> Result<Self, NotificationError> {
        let sender = match &config.webhook_url {
            Some(url) => Self::Webhook(WebhookNotificationSender::new(
                url.clone(),
                config.admin_email.clone(),
            )?),
            None => Self::Logging(LoggingNotificationSender::new(config.admin_email.clone())),
        };
        Ok(sender)
    }
}

#[async_trait]
impl NotificationSender for ConfiguredSender {
    async fn send_registration_notification(
        &self,
        draft: &RegistrationDraft,
    ) -> Result<(), NotificationError> {
        match self {
            Self::Logging(sender) => sender.send_registration_notification(draft).await,
            Self::Webhook(sender) => sender.send_registration_notification(draft).await,
        }
    }
}
