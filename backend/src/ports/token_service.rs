//! Token issuing and verification port.
//!
//! Access tokens authenticate API calls; refresh tokens can only be
//! exchanged for a new access token.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, UserId};

/// Which kind of token is being issued or was presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Identity baked into a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub user_id: UserId,
    pub email: String,
}

/// A freshly signed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub kind: TokenKind,
    /// Seconds until expiry.
    pub expires_in: i64,
}

/// Verified token contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: TokenSubject,
    pub kind: TokenKind,
    pub expires_at: i64,
}

/// Signs and verifies bearer tokens. Synchronous: signing is pure CPU work.
pub trait TokenService: Send + Sync {
    fn issue(&self, subject: &TokenSubject, kind: TokenKind) -> Result<IssuedToken, AuthError>;

    /// Fails with `TokenExpired` or `InvalidToken`.
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;
}
