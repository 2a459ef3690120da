//! Registration confirmation delivery.
//!
//! Delivery is best-effort. [`dispatch`] bounds each attempt with a timeout
//! and reports failures only through logs; callers never see them.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::model::Event;

pub const CONFIRMATION_SUBJECT: &str = "Event Registration Confirmation";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("notification endpoint returned HTTP {status}")]
    Rejected { status: u16 },

    #[error("notification timed out after {0:?}")]
    TimedOut(Duration),
}

/// A confirmation message for one registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl ConfirmationMessage {
    pub fn for_event(from: &str, to: &str, event: &Event) -> Self {
        let body = format!(
            "Registration confirmed!\n\n\
             You have successfully registered for the following event:\n\n\
             {title}\n\
             Description: {description}\n\
             Date: {date}\n\
             Time: {time}\n\n\
             We look forward to seeing you at the event!\n",
            title = event.title,
            description = event.description,
            date = event.date.format("%Y-%m-%d"),
            time = event.time.format("%H:%M"),
        );

        Self {
            from: from.to_string(),
            to: to.to_string(),
            subject: CONFIRMATION_SUBJECT.to_string(),
            body,
        }
    }
}

/// Delivers registration confirmations.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, recipient: &str, event: &Event) -> Result<(), NotifyError>;
}

/// Development notifier: logs the message instead of sending it.
pub struct LogNotifier {
    from: String,
}

impl LogNotifier {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, recipient: &str, event: &Event) -> Result<(), NotifyError> {
        let message = ConfirmationMessage::for_event(&self.from, recipient, event);
        info!(
            to = %message.to,
            subject = %message.subject,
            event_id = %event.id,
            title = %event.title,
            date = %event.date,
            time = %event.time.format("%H:%M"),
            "Simulated confirmation email"
        );
        Ok(())
    }
}

/// Payload posted by [`WebhookNotifier`].
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    #[serde(flatten)]
    message: ConfirmationMessage,
    event: &'a Event,
}

/// Posts confirmations as JSON to an HTTP endpoint (for example a mail relay).
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
    from: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            from: from.into(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, recipient: &str, event: &Event) -> Result<(), NotifyError> {
        let payload = WebhookPayload {
            message: ConfirmationMessage::for_event(&self.from, recipient, event),
            event,
        };

        let response = self.client.post(&self.url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

/// Sends one confirmation, bounded by `timeout`. Returns whether it was
/// delivered; failures are logged and otherwise dropped.
pub async fn dispatch(
    notifier: &dyn Notifier,
    timeout: Duration,
    recipient: &str,
    event: &Event,
) -> bool {
    let result = match tokio::time::timeout(timeout, notifier.notify(recipient, event)).await {
        Ok(result) => result,
        Err(_) => Err(NotifyError::TimedOut(timeout)),
    };

    match result {
        Ok(()) => true,
        Err(e) => {
            warn!(
                error = %e,
                event_id = %event.id,
                "Failed to send registration confirmation"
            );
            false
        }
    }
}
