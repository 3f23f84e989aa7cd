//! Translation of application failures into HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::ServiceError;
use crate::domain::foundation::{AuthError, DomainError, ErrorCode, ValidationError};
use crate::ports::{EmailError, PaymentError, PaymentErrorCode};

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

/// Error returned by every HTTP handler.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl ApiError {
    pub fn not_found(code: ErrorCode, message: impl Into<String>) -> Self {
        Self(ServiceError::not_found(code, message))
    }

    pub fn bad_request(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(ServiceError::validation(field, message))
    }

    /// Status, machine-readable code and client-facing message.
    fn parts(&self) -> (StatusCode, String, String) {
        match &self.0 {
            ServiceError::Domain(e) => domain_parts(e),
            ServiceError::Auth(e) => auth_parts(e),
            ServiceError::Payment(e) => payment_parts(e),
            ServiceError::Email(e) => {
                tracing::error!(error = %e, "email delivery failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EMAIL_SEND_FAILED".to_string(),
                    "Failed to send email".to_string(),
                )
            }
        }
    }
}

fn domain_parts(e: &DomainError) -> (StatusCode, String, String) {
    let status = match e.code {
        code if code.is_validation() => StatusCode::BAD_REQUEST,
        code if code.is_not_found() => StatusCode::NOT_FOUND,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!(code = %e.code, error = %e.message, "request failed");
        return (status, e.code.to_string(), "Internal server error".to_string());
    }
    (status, e.code.to_string(), e.message.clone())
}

fn auth_parts(e: &AuthError) -> (StatusCode, String, String) {
    match e {
        AuthError::InsufficientPermissions => {
            (StatusCode::FORBIDDEN, "FORBIDDEN".to_string(), e.to_string())
        }
        AuthError::ServiceUnavailable(detail) => {
            tracing::error!(error = %detail, "auth service failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_SERVICE_ERROR".to_string(),
                "Authentication service unavailable".to_string(),
            )
        }
        AuthError::TokenExpired => (
            StatusCode::UNAUTHORIZED,
            "TOKEN_EXPIRED".to_string(),
            e.to_string(),
        ),
        AuthError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            "INVALID_CREDENTIALS".to_string(),
            e.to_string(),
        ),
        AuthError::InvalidToken | AuthError::UserNotFound => (
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED".to_string(),
            AuthError::InvalidToken.to_string(),
        ),
    }
}

fn payment_parts(e: &PaymentError) -> (StatusCode, String, String) {
    let status = match e.code {
        PaymentErrorCode::InvalidRequest
        | PaymentErrorCode::CardDeclined
        | PaymentErrorCode::InvalidWebhook => StatusCode::BAD_REQUEST,
        PaymentErrorCode::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let code = format!("PAYMENT_{}", e.code.to_string().to_uppercase());

    if status.is_server_error() {
        tracing::error!(code = %e.code, error = %e.message, "payment provider failure");
        return (status, code, "Payment provider error".to_string());
    }
    (status, code, e.message.clone())
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_client_error() {
            tracing::warn!(%status, code = %code, error = %message, "request rejected");
        }
        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err.into())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        Self(err.into())
    }
}

impl From<EmailError> for ApiError {
    fn from(err: EmailError) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: impl Into<ApiError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn domain_codes_map_to_statuses() {
        assert_eq!(
            status_of(DomainError::new(ErrorCode::AlreadyExists, "dup")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::new(ErrorCode::UserNotFound, "gone")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(DomainError::database("connection refused")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ValidationError::empty_field("name")),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn auth_errors_map_to_401_or_403() {
        assert_eq!(status_of(AuthError::InvalidToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AuthError::TokenExpired), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(AuthError::InsufficientPermissions),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(AuthError::service_unavailable("bcrypt")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn payment_errors_split_between_caller_and_provider() {
        assert_eq!(
            status_of(PaymentError::invalid_request("bad amount")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(PaymentError::invalid_webhook("bad signature")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(PaymentError::not_found("Subscription")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(PaymentError::network("timeout")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn email_failures_are_server_errors() {
        assert_eq!(
            status_of(EmailError::Transport("down".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let err = ApiError::from(DomainError::database("password=hunter2"));
        let (_, code, message) = err.parts();
        assert_eq!(code, "DATABASE_ERROR");
        assert_eq!(message, "Internal server error");
    }

    #[test]
    fn payment_codes_are_prefixed() {
        let (_, code, _) = ApiError::from(PaymentError::invalid_request("x")).parts();
        assert_eq!(code, "PAYMENT_INVALID_REQUEST");
    }
}
