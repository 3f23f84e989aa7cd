//! Authentication types for the domain layer.
//!
//! These types represent the caller behind a validated bearer token.
//! They have no provider dependencies: the JWT adapter, or a mock in tests,
//! populates them through the `SessionValidator` port.

use super::UserId;
use thiserror::Error;

/// Authenticated user extracted from a validated access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The account identifier.
    pub id: UserId,

    /// User's email address.
    pub email: String,

    /// Full name if the user provided one.
    pub display_name: Option<String>,

    /// Whether the account carries administrator privileges.
    pub is_admin: bool,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        display_name: Option<String>,
        is_admin: bool,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            display_name,
            is_admin,
        }
    }

    /// Returns the user's display name, or email as fallback.
    pub fn display_name_or_email(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }

    /// Fails with `InsufficientPermissions` unless the user is an admin.
    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermissions)
        }
    }
}

/// Authentication errors that can occur during login or token validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Token expired")]
    TokenExpired,

    /// Email/password pair did not match an active account.
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// Token is valid but the user no longer exists.
    #[error("User not found")]
    UserNotFound,

    /// User exists but lacks required permissions for this action.
    #[error("Admin access required")]
    InsufficientPermissions,

    /// The authentication backend is unavailable (hashing, signing, storage).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the user should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken
                | AuthError::TokenExpired
                | AuthError::UserNotFound
                | AuthError::InvalidCredentials
        )
    }
}
