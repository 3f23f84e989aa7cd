//! JWT-backed session validation.
//!
//! A token alone is not enough: the account behind it must still exist and
//! be active, so deactivating a user revokes their outstanding tokens.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::{SessionValidator, TokenKind, TokenService, UserRepository};

/// Validates access tokens and loads the current account.
pub struct JwtSessionValidator {
    tokens: Arc<dyn TokenService>,
    users: Arc<dyn UserRepository>,
}

impl JwtSessionValidator {
    pub fn new(tokens: Arc<dyn TokenService>, users: Arc<dyn UserRepository>) -> Self {
        Self { tokens, users }
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.tokens.verify(token)?;
        if claims.kind != TokenKind::Access {
            tracing::debug!(user_id = %claims.subject.user_id, "refresh token used as bearer");
            return Err(AuthError::InvalidToken);
        }

        let user = self
            .users
            .find_by_id(claims.subject.user_id)
            .await
            .map_err(|e| AuthError::service_unavailable(e.to_string()))?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_active {
            tracing::info!(user_id = %user.id, "token presented for inactive account");
            return Err(AuthError::InvalidToken);
        }

        Ok(AuthenticatedUser::new(
            user.id,
            user.email,
            user.full_name,
            user.is_admin,
        ))
    }
}
