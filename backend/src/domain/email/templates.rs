//! Built-in email templates.
//!
//! Named templates use `{{key}}` placeholders filled from a JSON object.
//! Placeholders with no matching key are left as-is.

use serde_json::{Map, Value};

use crate::domain::foundation::ValidationError;

use super::EmailMessage;

/// Product name and link target shared by all templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branding {
    pub app_name: String,
    /// Base URL of the web frontend; reset and verification links point here.
    pub frontend_url: String,
}

impl Branding {
    pub fn new(app_name: impl Into<String>, frontend_url: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            frontend_url: frontend_url.into().trim_end_matches('/').to_string(),
        }
    }
}

const WELCOME_HTML: &str = r#"<html>
  <body style="font-family: Arial, sans-serif; padding: 20px;">
    <h2>Welcome to {{app_name}}, {{name}}!</h2>
    <p>Thank you for joining us. We're excited to have you on board.</p>
    <p>Your account has been created with the email <strong>{{email}}</strong>.</p>
    <p>Best regards,<br>The {{app_name}} Team</p>
  </body>
</html>"#;

const PASSWORD_RESET_HTML: &str = r#"<html>
  <body style="font-family: Arial, sans-serif; padding: 20px;">
    <h2>Reset your password</h2>
    <p>We received a request to reset the password for your {{app_name}} account.</p>
    <p><a href="{{link}}">Choose a new password</a></p>
    <p>If you did not request this, you can ignore this email.</p>
  </body>
</html>"#;

const VERIFICATION_HTML: &str = r#"<html>
  <body style="font-family: Arial, sans-serif; padding: 20px;">
    <h2>Confirm your email address</h2>
    <p>Please confirm the email address for your {{app_name}} account.</p>
    <p><a href="{{link}}">Verify email</a></p>
  </body>
</html>"#;

const NOTIFICATION_HTML: &str = r#"<html>
  <body style="font-family: Arial, sans-serif; padding: 20px;">
    <h2>{{title}}</h2>
    <p>{{message}}</p>
    <p>The {{app_name}} Team</p>
  </body>
</html>"#;

/// Templates addressable by name through the template endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateName {
    Welcome,
    PasswordReset,
    Verification,
    Notification,
}

impl TemplateName {
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        match name {
            "welcome" => Ok(TemplateName::Welcome),
            "password_reset" => Ok(TemplateName::PasswordReset),
            "verification" => Ok(TemplateName::Verification),
            "notification" => Ok(TemplateName::Notification),
            other => Err(ValidationError::invalid_format(
                "template_name",
                format!("unknown template '{}'", other),
            )),
        }
    }

    fn source(&self) -> &'static str {
        match self {
            TemplateName::Welcome => WELCOME_HTML,
            TemplateName::PasswordReset => PASSWORD_RESET_HTML,
            TemplateName::Verification => VERIFICATION_HTML,
            TemplateName::Notification => NOTIFICATION_HTML,
        }
    }

    fn default_subject(&self, branding: &Branding) -> String {
        match self {
            TemplateName::Welcome => format!("Welcome to {}!", branding.app_name),
            TemplateName::PasswordReset => format!("Reset your {} password", branding.app_name),
            TemplateName::Verification => format!("Verify your {} email", branding.app_name),
            TemplateName::Notification => format!("A message from {}", branding.app_name),
        }
    }
}

/// Replaces every `{{key}}` with the matching context value.
pub fn render(source: &str, context: &Map<String, Value>) -> String {
    let mut out = source.to_string();
    for (key, value) in context {
        let replacement = match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };
        out = out.replace(&format!("{{{{{}}}}}", key), &replacement);
    }
    out
}

/// Renders a named template. A `subject` key in `context` overrides the
/// template's default subject.
pub fn render_named(
    name: TemplateName,
    to: &str,
    context: &Map<String, Value>,
    branding: &Branding,
) -> EmailMessage {
    let mut context = context.clone();
    context
        .entry("app_name")
        .or_insert_with(|| Value::String(branding.app_name.clone()));
    let subject = context
        .get("subject")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| name.default_subject(branding));
    EmailMessage::html(to, subject, render(name.source(), &context))
}

pub fn welcome(to: &str, name: &str, branding: &Branding) -> EmailMessage {
    let mut context = Map::new();
    context.insert("name".into(), Value::String(name.to_string()));
    context.insert("email".into(), Value::String(to.to_string()));
    render_named(TemplateName::Welcome, to, &context, branding)
}

pub fn password_reset(to: &str, reset_token: &str, branding: &Branding) -> EmailMessage {
    let link = format!("{}/reset-password?token={}", branding.frontend_url, reset_token);
    let mut context = Map::new();
    context.insert("link".into(), Value::String(link));
    render_named(TemplateName::PasswordReset, to, &context, branding)
}

pub fn verification(to: &str, verification_token: &str, branding: &Branding) -> EmailMessage {
    let link = format!("{}/verify-email?token={}", branding.frontend_url, verification_token);
    let mut context = Map::new();
    context.insert("link".into(), Value::String(link));
    render_named(TemplateName::Verification, to, &context, branding)
}
