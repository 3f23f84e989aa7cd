//! Resend email delivery.
//!
//! Sends one message per `POST /emails`, authenticated with a bearer key.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::config::EmailConfig;
use crate::domain::email::{Branding, EmailMessage};
use crate::ports::{EmailError, EmailSender};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ResendErrorBody {
    message: Option<String>,
    name: Option<String>,
}

/// [`EmailSender`] backed by the Resend HTTP API.
pub struct ResendEmailSender {
    api_key: Secret<String>,
    api_base_url: String,
    from: String,
    branding: Branding,
    http_client: reqwest::Client,
}

impl ResendEmailSender {
    pub fn new(
        api_key: Secret<String>,
        api_base_url: impl Into<String>,
        from: impl Into<String>,
        branding: Branding,
    ) -> Result<Self, EmailError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| EmailError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            from: from.into(),
            branding,
            http_client,
        })
    }

    pub fn from_config(config: &EmailConfig, app_name: &str) -> Result<Self, EmailError> {
        Self::new(
            config.resend_api_key.clone(),
            config.resend_api_base_url.clone(),
            config.from_header(),
            Branding::new(app_name, config.frontend_url.clone()),
        )
    }
}

/// Client errors mean the message itself is unacceptable; anything else is
/// the transport's fault.
fn classify(status: reqwest::StatusCode, body: &str) -> EmailError {
    let detail = serde_json::from_str::<ResendErrorBody>(body).ok();
    let message = detail
        .as_ref()
        .and_then(|d| d.message.clone())
        .unwrap_or_else(|| format!("Resend returned {}", status));
    let name = detail.and_then(|d| d.name);

    if status.is_client_error() && status != reqwest::StatusCode::TOO_MANY_REQUESTS {
        match name {
            Some(name) => EmailError::Rejected(format!("{} ({})", message, name)),
            None => EmailError::Rejected(message),
        }
    } else {
        EmailError::Transport(message)
    }
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    fn branding(&self) -> &Branding {
        &self.branding
    }

    async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        message
            .validate()
            .map_err(|e| EmailError::Rejected(e.to_string()))?;

        let (html, text) = if message.html {
            (Some(message.body.as_str()), None)
        } else {
            (None, Some(message.body.as_str()))
        };
        let request = SendEmailRequest {
            from: &self.from,
            to: [message.to.as_str()],
            subject: &message.subject,
            html,
            text,
        };

        let response = self
            .http_client
            .post(format!("{}/emails", self.api_base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Resend request failed");
                EmailError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = classify(status, &body);
            tracing::error!(%status, error = %error, recipient = %message.to, "email not sent");
            return Err(error);
        }

        let sent: SendEmailResponse = response
            .json()
            .await
            .map_err(|e| EmailError::Transport(format!("Invalid Resend response: {}", e)))?;
        tracing::info!(email_id = %sent.id, recipient = %message.to, "email sent");

        Ok(())
    }
}

impl std::fmt::Debug for ResendEmailSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendEmailSender")
            .field("api_base_url", &self.api_base_url)
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}
