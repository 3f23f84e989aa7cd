//! Outgoing email messages and bulk-send bookkeeping.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;
use crate::domain::user::validate_email;

/// Upper bound on recipients in a single bulk request.
pub const MAX_BULK_RECIPIENTS: usize = 500;

/// A single outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
    /// Whether `body` is HTML rather than plain text.
    pub html: bool,
}

impl EmailMessage {
    pub fn html(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            html: true,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.to)?;
        if self.subject.trim().is_empty() {
            return Err(ValidationError::empty_field("subject"));
        }
        Ok(())
    }
}

/// Outcome of sending one message to many recipients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkSendReport {
    pub sent: usize,
    pub failed: usize,
    /// Recipients whose delivery failed.
    pub failed_recipients: Vec<String>,
}

impl BulkSendReport {
    pub fn record(&mut self, recipient: &str, delivered: bool) {
        if delivered {
            self.sent += 1;
        } else {
            self.failed += 1;
            self.failed_recipients.push(recipient.to_string());
        }
    }

    pub fn summary(&self) -> String {
        format!("Sent {} emails, {} failed", self.sent, self.failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_requires_address_and_subject() {
        assert!(EmailMessage::html("a@example.com", "Hi", "<p>x</p>").validate().is_ok());
        assert!(EmailMessage::html("nope", "Hi", "x").validate().is_err());
        assert!(EmailMessage::html("a@example.com", " ", "x").validate().is_err());
    }

    #[test]
    fn report_counts_and_summarizes() {
        let mut report = BulkSendReport::default();
        report.record("a@example.com", true);
        report.record("b@example.com", false);
        report.record("c@example.com", true);
        assert_eq!(report.sent, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failed_recipients, vec!["b@example.com".to_string()]);
        assert_eq!(report.summary(), "Sent 2 emails, 1 failed");
    }
}
