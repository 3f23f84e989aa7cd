//! Email delivery port.
//!
//! Implementations only need [`EmailSender::send`]; the templated helpers and
//! bulk delivery are built on top of it.

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::email::{templates, BulkSendReport, Branding, EmailMessage, TemplateName};

/// Errors from email delivery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    /// The provider refused the message (bad recipient, policy, quota).
    #[error("Email rejected: {0}")]
    Rejected(String),

    /// The provider could not be reached or answered unexpectedly.
    #[error("Email transport failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Product name and frontend URL used by the templated helpers.
    fn branding(&self) -> &Branding;

    /// Delivers one message.
    async fn send(&self, message: EmailMessage) -> Result<(), EmailError>;

    async fn send_welcome(&self, email: &str, name: &str) -> Result<(), EmailError> {
        self.send(templates::welcome(email, name, self.branding())).await
    }

    async fn send_password_reset(&self, email: &str, reset_token: &str) -> Result<(), EmailError> {
        self.send(templates::password_reset(email, reset_token, self.branding()))
            .await
    }

    async fn send_verification(
        &self,
        email: &str,
        verification_token: &str,
    ) -> Result<(), EmailError> {
        self.send(templates::verification(email, verification_token, self.branding()))
            .await
    }

    async fn send_template(
        &self,
        to: &str,
        template: TemplateName,
        context: &Map<String, Value>,
    ) -> Result<(), EmailError> {
        self.send(templates::render_named(template, to, context, self.branding()))
            .await
    }

    /// Sends the same message to every recipient concurrently. Individual
    /// failures are counted, never propagated.
    async fn send_bulk(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
        html: bool,
    ) -> BulkSendReport {
        let sends = recipients.iter().map(|to| async move {
            let message = EmailMessage {
                to: to.clone(),
                subject: subject.to_string(),
                body: body.to_string(),
                html,
            };
            let outcome = self.send(message).await;
            if let Err(e) = &outcome {
                tracing::warn!(recipient = %to, error = %e, "bulk email delivery failed");
            }
            (to, outcome.is_ok())
        });

        let mut report = BulkSendReport::default();
        for (to, delivered) in join_all(sends).await {
            report.record(to, delivered);
        }
        report
    }
}
