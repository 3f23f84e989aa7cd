//! bcrypt password hashing.
//!
//! Hashing is deliberately slow, so both operations run on the blocking pool.

use async_trait::async_trait;

use crate::domain::foundation::AuthError;
use crate::ports::PasswordHasher;

/// [`PasswordHasher`] backed by the `bcrypt` crate.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AuthError::service_unavailable(format!("hashing task failed: {}", e)))?
            .map_err(|e| {
                tracing::error!(error = %e, "password hashing failed");
                AuthError::service_unavailable("password hashing failed")
            })
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AuthError::service_unavailable(format!("hashing task failed: {}", e)))?
            .map_err(|e| {
                tracing::error!(error = %e, "password verification failed");
                AuthError::service_unavailable("password verification failed")
            })
    }
}
