//! HTTP DTOs for authentication endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::auth::TokenPair;
use crate::ports::IssuedToken;

/// Login body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Refresh body.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Bearer token response. `refresh_token` is absent on refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub token_type: &'static str,
    /// Seconds until the access token expires.
    pub expires_in: i64,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access.token,
            refresh_token: Some(pair.refresh.token),
            token_type: "bearer",
            expires_in: pair.access.expires_in,
        }
    }
}

impl From<IssuedToken> for TokenResponse {
    fn from(access: IssuedToken) -> Self {
        Self {
            access_token: access.token,
            refresh_token: None,
            token_type: "bearer",
            expires_in: access.expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::TokenKind;

    #[test]
    fn refreshed_token_omits_refresh_field() {
        let response = TokenResponse::from(IssuedToken {
            token: "abc".to_string(),
            kind: TokenKind::Access,
            expires_in: 1800,
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["token_type"], "bearer");
        assert!(json.get("refresh_token").is_none());
    }
}
