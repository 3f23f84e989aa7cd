//! HTTP handlers for email endpoints.

use axum::extract::{Json, Path, State};
use axum::response::IntoResponse;

use crate::application::handlers::email::{SendPasswordResetCommand, SendVerificationCommand};
use crate::application::handlers::user::SendWelcomeEmailCommand;
use crate::domain::email::{EmailMessage, TemplateName, MAX_BULK_RECIPIENTS};
use crate::domain::foundation::{ErrorCode, UserId, ValidationError};
use crate::domain::user::validate_email;

use super::super::dto::SuccessResponse;
use super::super::error::ApiError;
use super::super::middleware::{RequireAdmin, RequireAuth};
use super::super::state::AppState;
use super::dto::{BulkEmailRequest, BulkEmailResponse, SendEmailRequest, TemplateEmailRequest};

fn user_id(raw: i64) -> Result<UserId, ApiError> {
    UserId::new(raw).map_err(|_| ApiError::not_found(ErrorCode::UserNotFound, "User not found"))
}

/// POST /api/v1/email/send
pub async fn send_email(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Json(request): Json<SendEmailRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message = EmailMessage::from(request);
    message.validate()?;

    state.email.send(message).await?;
    tracing::info!(user_id = %caller.id, "custom email sent");
    Ok(Json(SuccessResponse::ok("Email sent successfully")))
}

/// POST /api/v1/email/welcome/:user_id
pub async fn send_welcome(
    State(state): State<AppState>,
    RequireAuth(_caller): RequireAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .welcome_email_handler()
        .handle(SendWelcomeEmailCommand {
            user_id: user_id(id)?,
        })
        .await?;
    Ok(Json(SuccessResponse::ok("Welcome email sent successfully")))
}

/// POST /api/v1/email/password-reset/:email
pub async fn send_password_reset(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .password_reset_handler()
        .handle(SendPasswordResetCommand { email })
        .await?;
    Ok(Json(SuccessResponse::ok("Password reset email sent successfully")))
}

/// POST /api/v1/email/verification/:user_id
pub async fn send_verification(
    State(state): State<AppState>,
    RequireAuth(_caller): RequireAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .verification_handler()
        .handle(SendVerificationCommand {
            user_id: user_id(id)?,
        })
        .await?;
    Ok(Json(SuccessResponse::ok("Verification email sent successfully")))
}

/// POST /api/v1/email/template
pub async fn send_template(
    State(state): State<AppState>,
    RequireAuth(_caller): RequireAuth,
    Json(request): Json<TemplateEmailRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_email(&request.to)?;
    let template = TemplateName::parse(&request.template_name)?;

    state
        .email
        .send_template(&request.to, template, &request.context)
        .await?;
    Ok(Json(SuccessResponse::ok("Template email sent successfully")))
}

/// POST /api/v1/email/bulk (admin)
///
/// Per-recipient failures are reported in the body, not as an error status.
pub async fn send_bulk(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Json(request): Json<BulkEmailRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.recipients.is_empty() {
        return Err(ValidationError::empty_field("recipients").into());
    }
    if request.recipients.len() > MAX_BULK_RECIPIENTS {
        return Err(ValidationError::out_of_range(
            "recipients",
            1,
            MAX_BULK_RECIPIENTS as i64,
            request.recipients.len() as i64,
        )
        .into());
    }
    if request.subject.trim().is_empty() {
        return Err(ValidationError::empty_field("subject").into());
    }

    let report = state
        .email
        .send_bulk(&request.recipients, &request.subject, &request.body, request.html)
        .await;
    tracing::info!(
        actor = %actor.id,
        sent = report.sent,
        failed = report.failed,
        "bulk email finished"
    );
    Ok(Json(BulkEmailResponse::from(report)))
}
