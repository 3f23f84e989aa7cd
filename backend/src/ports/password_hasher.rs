//! Password hashing port.

use async_trait::async_trait;

use crate::domain::foundation::AuthError;

/// One-way password hashing.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// `Ok(false)` for a wrong password; `Err` only when verification itself failed.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}
