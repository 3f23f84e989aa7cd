//! Error type shared by all application handlers.

use thiserror::Error;

use crate::domain::foundation::{AuthError, DomainError, ErrorCode, ValidationError};
use crate::ports::{EmailError, PaymentError};

/// Failure of an application command or query.
///
/// Each variant keeps the original port or domain error so the HTTP layer
/// can choose a status without string matching.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Email(#[from] EmailError),
}

impl ServiceError {
    pub fn not_found(code: ErrorCode, message: impl Into<String>) -> Self {
        ServiceError::Domain(DomainError::new(code, message))
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Domain(DomainError::validation(field, message))
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Domain(err.into())
    }
}
