//! In-process email sender that keeps every message it is asked to send.
//!
//! Used for local development without a Resend key and in tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::email::{Branding, EmailMessage};
use crate::ports::{EmailError, EmailSender};

#[derive(Default)]
struct Outbox {
    sent: Vec<EmailMessage>,
    failing_recipients: HashSet<String>,
    fail_all: Option<EmailError>,
}

/// Records messages instead of delivering them.
#[derive(Clone)]
pub struct RecordingEmailSender {
    branding: Branding,
    outbox: Arc<Mutex<Outbox>>,
}

impl RecordingEmailSender {
    pub fn new(branding: Branding) -> Self {
        Self {
            branding,
            outbox: Arc::new(Mutex::new(Outbox::default())),
        }
    }

    fn outbox(&self) -> MutexGuard<'_, Outbox> {
        self.outbox.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Messages to `recipient` will fail with `Rejected`.
    pub fn fail_for(&self, recipient: &str) {
        self.outbox()
            .failing_recipients
            .insert(recipient.to_lowercase());
    }

    /// Every send fails with `error` until cleared.
    pub fn fail_all(&self, error: EmailError) {
        self.outbox().fail_all = Some(error);
    }

    pub fn clear_failures(&self) {
        let mut outbox = self.outbox();
        outbox.failing_recipients.clear();
        outbox.fail_all = None;
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.outbox().sent.clone()
    }

    pub fn last_sent(&self) -> Option<EmailMessage> {
        self.outbox().sent.last().cloned()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    fn branding(&self) -> &Branding {
        &self.branding
    }

    async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        message
            .validate()
            .map_err(|e| EmailError::Rejected(e.to_string()))?;

        let mut outbox = self.outbox();
        if let Some(error) = &outbox.fail_all {
            return Err(error.clone());
        }
        if outbox
            .failing_recipients
            .contains(&message.to.to_lowercase())
        {
            return Err(EmailError::Rejected(format!(
                "recipient {} refused",
                message.to
            )));
        }

        tracing::debug!(recipient = %message.to, subject = %message.subject, "email recorded");
        outbox.sent.push(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> RecordingEmailSender {
        RecordingEmailSender::new(Branding::new("R Firm", "http://localhost:3000"))
    }

    #[tokio::test]
    async fn welcome_email_is_recorded() {
        let sender = sender();
        sender.send_welcome("jane@example.com", "Jane").await.unwrap();

        let message = sender.last_sent().unwrap();
        assert_eq!(message.to, "jane@example.com");
        assert!(message.html);
        assert!(message.subject.contains("R Firm"));
    }

    #[tokio::test]
    async fn password_reset_links_to_frontend() {
        let sender = sender();
        sender
            .send_password_reset("jane@example.com", "tok123")
            .await
            .unwrap();

        let body = sender.last_sent().unwrap().body;
        assert!(body.contains("http://localhost:3000/reset-password?token=tok123"));
    }

    #[tokio::test]
    async fn bulk_counts_partial_failures() {
        let sender = sender();
        sender.fail_for("b@example.com");

        let recipients = vec![
            "a@example.com".to_string(),
            "b@example.com".to_string(),
            "c@example.com".to_string(),
        ];
        let report = sender.send_bulk(&recipients, "News", "Hello", false).await;

        assert_eq!(report.sent, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failed_recipients, vec!["b@example.com".to_string()]);
        assert_eq!(sender.sent().len(), 2);
    }

    #[tokio::test]
    async fn fail_all_blocks_delivery() {
        let sender = sender();
        sender.fail_all(EmailError::Transport("offline".to_string()));
        assert!(sender.send_welcome("a@example.com", "A").await.is_err());

        sender.clear_failures();
        assert!(sender.send_welcome("a@example.com", "A").await.is_ok());
    }
}
