//! HS256 token service.
//!
//! Signs access and refresh tokens with a shared secret. Verification checks
//! signature, issuer and expiry, then hands the claims back so callers can
//! enforce the token kind they expect.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, Timestamp, UserId};
use crate::ports::{IssuedToken, TokenClaims, TokenKind, TokenService, TokenSubject};

/// Claims carried by every token this service signs.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id as a decimal string.
    sub: String,
    email: String,
    #[serde(rename = "type")]
    kind: TokenKind,
    iss: String,
    iat: i64,
    exp: i64,
    /// Unique per token so two tokens issued in the same second differ.
    jti: String,
}

/// JWT-backed [`TokenService`].
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl JwtTokenService {
    pub fn new(
        secret: &Secret<String>,
        issuer: impl Into<String>,
        access_ttl_secs: i64,
        refresh_ttl_secs: i64,
    ) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            issuer: issuer.into(),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            config.jwt_issuer.clone(),
            config.access_token_ttl_secs,
            config.refresh_token_ttl_secs,
        )
    }

    fn ttl_for(&self, kind: TokenKind) -> i64 {
        match kind {
            TokenKind::Access => self.access_ttl_secs,
            TokenKind::Refresh => self.refresh_ttl_secs,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = 0;
        validation
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, subject: &TokenSubject, kind: TokenKind) -> Result<IssuedToken, AuthError> {
        let now = Timestamp::now().as_unix_secs();
        let ttl = self.ttl_for(kind);
        let claims = Claims {
            sub: subject.user_id.to_string(),
            email: subject.email.clone(),
            kind,
            iss: self.issuer.clone(),
            iat: now,
            exp: now + ttl,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!(error = %e, "failed to sign token");
                AuthError::service_unavailable("token signing failed")
            })?;

        Ok(IssuedToken {
            token,
            kind,
            expires_in: ttl,
        })
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation()).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("token expired");
                    AuthError::TokenExpired
                }
                _ => {
                    tracing::debug!(error = %e, "token rejected");
                    AuthError::InvalidToken
                }
            },
        )?;

        let claims = data.claims;
        let user_id = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(TokenClaims {
            subject: TokenSubject {
                user_id,
                email: claims.email,
            },
            kind: claims.kind,
            expires_at: claims.exp,
        })
    }
}

impl std::fmt::Debug for JwtTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenService")
            .field("issuer", &self.issuer)
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtTokenService {
        JwtTokenService::new(
            &Secret::new("unit-test-secret-unit-test-secret".to_string()),
            "saas-api-test",
            1800,
            604_800,
        )
    }

    fn subject() -> TokenSubject {
        TokenSubject {
            user_id: UserId::new(42).unwrap(),
            email: "alice@example.com".to_string(),
        }
    }

    #[test]
    fn issued_access_token_verifies() {
        let service = service();
        let issued = service.issue(&subject(), TokenKind::Access).unwrap();

        assert_eq!(issued.expires_in, 1800);
        let claims = service.verify(&issued.token).unwrap();
        assert_eq!(claims.subject, subject());
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn refresh_token_keeps_its_kind() {
        let service = service();
        let issued = service.issue(&subject(), TokenKind::Refresh).unwrap();

        assert_eq!(issued.expires_in, 604_800);
        assert_eq!(service.verify(&issued.token).unwrap().kind, TokenKind::Refresh);
    }

    #[test]
    fn two_tokens_for_same_subject_differ() {
        let service = service();
        let a = service.issue(&subject(), TokenKind::Access).unwrap();
        let b = service.issue(&subject(), TokenKind::Access).unwrap();
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let service = JwtTokenService::new(
            &Secret::new("unit-test-secret-unit-test-secret".to_string()),
            "saas-api-test",
            -10,
            -10,
        );
        let issued = service.issue(&subject(), TokenKind::Access).unwrap();

        assert_eq!(service.verify(&issued.token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let other = JwtTokenService::new(
            &Secret::new("another-secret-another-secret-xx".to_string()),
            "saas-api-test",
            1800,
            1800,
        );
        let issued = other.issue(&subject(), TokenKind::Access).unwrap();

        assert_eq!(service().verify(&issued.token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn token_from_other_issuer_is_invalid() {
        let other = JwtTokenService::new(
            &Secret::new("unit-test-secret-unit-test-secret".to_string()),
            "someone-else",
            1800,
            1800,
        );
        let issued = other.issue(&subject(), TokenKind::Access).unwrap();

        assert_eq!(service().verify(&issued.token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn garbage_is_invalid() {
        assert_eq!(service().verify("not.a.jwt"), Err(AuthError::InvalidToken));
    }
}
