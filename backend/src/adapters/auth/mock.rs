//! Mock session validator for testing.
//!
//! Lets HTTP tests authenticate with fixed tokens instead of minting JWTs.
//!
//! ```ignore
//! let validator = MockSessionValidator::new()
//!     .with_test_user("user-token", 1)
//!     .with_admin("admin-token", 2);
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Maps fixed tokens to users. Unknown tokens return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    force_error: RwLock<Option<AuthError>>,
}

fn test_user(id: i64, is_admin: bool) -> Result<AuthenticatedUser, AuthError> {
    let id = UserId::new(id).map_err(|_| AuthError::UserNotFound)?;
    Ok(AuthenticatedUser::new(
        id,
        format!("user{}@test.example.com", id),
        Some(format!("Test User {}", id)),
        is_admin,
    ))
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.add_token(token, user);
        self
    }

    /// Registers a regular user with id `user_id`. Non-positive ids are ignored.
    pub fn with_test_user(self, token: impl Into<String>, user_id: i64) -> Self {
        match test_user(user_id, false) {
            Ok(user) => self.with_user(token, user),
            Err(_) => self,
        }
    }

    /// Registers an administrator with id `user_id`.
    pub fn with_admin(self, token: impl Into<String>, user_id: i64) -> Self {
        match test_user(user_id, true) {
            Ok(user) => self.with_user(token, user),
            Err(_) => self,
        }
    }

    /// Forces every validation to fail with `error`.
    pub fn with_error(self, error: AuthError) -> Self {
        *self
            .force_error
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
        self
    }

    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.into(), user);
    }

    pub fn remove_token(&self, token: &str) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self
            .force_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
