//! HTTP DTOs for email endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::email::{BulkSendReport, EmailMessage};

fn default_html() -> bool {
    true
}

/// Body of `POST /email/send`.
#[derive(Debug, Clone, Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub body: String,
    #[serde(default = "default_html")]
    pub html: bool,
}

impl From<SendEmailRequest> for EmailMessage {
    fn from(request: SendEmailRequest) -> Self {
        EmailMessage {
            to: request.to,
            subject: request.subject,
            body: request.body,
            html: request.html,
        }
    }
}

/// Body of `POST /email/template`.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateEmailRequest {
    pub to: String,
    pub template_name: String,
    #[serde(default)]
    pub context: Map<String, Value>,
}

/// Body of `POST /email/bulk`.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkEmailRequest {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    #[serde(default = "default_html")]
    pub html: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkEmailResponse {
    pub success: bool,
    pub message: String,
    pub details: BulkSendReport,
}

impl From<BulkSendReport> for BulkEmailResponse {
    fn from(report: BulkSendReport) -> Self {
        Self {
            success: true,
            message: report.summary(),
            details: report,
        }
    }
}
