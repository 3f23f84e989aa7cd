//! Session validation port.
//!
//! The HTTP auth middleware depends only on this trait, so the JWT adapter
//! and the test mock are interchangeable.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates bearer tokens and returns the caller behind them.
///
/// # Contract
///
/// - `Ok(AuthenticatedUser)` for a valid access token of an active account
/// - `Err(AuthError::InvalidToken)` for malformed, mis-signed or refresh tokens
/// - `Err(AuthError::TokenExpired)` for expired tokens
/// - `Err(AuthError::UserNotFound)` when the account no longer exists
#[async_trait]
pub trait SessionValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_validator_is_object_safe() {
        fn _assert_arc_send_sync<T: Send + Sync + ?Sized>() {}
        _assert_arc_send_sync::<std::sync::Arc<dyn SessionValidator>>();
    }
}
