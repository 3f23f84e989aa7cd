//! RefreshAccessTokenHandler - trades a refresh token for a new access token.

use std::sync::Arc;

use crate::application::ServiceError;
use crate::domain::foundation::AuthError;
use crate::ports::{IssuedToken, TokenKind, TokenService, UserRepository};

#[derive(Debug, Clone)]
pub struct RefreshAccessTokenCommand {
    pub refresh_token: String,
}

pub struct RefreshAccessTokenHandler {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenService>,
}

impl RefreshAccessTokenHandler {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<dyn TokenService>) -> Self {
        Self { users, tokens }
    }

    /// Only refresh tokens are accepted, and the account must still be active.
    pub async fn handle(&self, cmd: RefreshAccessTokenCommand) -> Result<IssuedToken, ServiceError> {
        let claims = self.tokens.verify(&cmd.refresh_token)?;
        if claims.kind != TokenKind::Refresh {
            return Err(AuthError::InvalidToken.into());
        }

        let active = self
            .users
            .find_by_id(claims.subject.user_id)
            .await?
            .is_some_and(|u| u.is_active);
        if !active {
            return Err(AuthError::InvalidToken.into());
        }

        Ok(self.tokens.issue(&claims.subject, TokenKind::Access)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::JwtTokenService;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::user::NewUser;
    use crate::ports::TokenSubject;
    use secrecy::Secret;

    async fn fixture() -> (RefreshAccessTokenHandler, Arc<JwtTokenService>, TokenSubject) {
        let users = Arc::new(InMemoryUserRepository::new());
        let tokens = Arc::new(JwtTokenService::new(
            &Secret::new("refresh-test-secret".to_string()),
            "saas-api",
            1800,
            3600,
        ));
        let user = users
            .create(NewUser {
                email: "jane@example.com".to_string(),
                username: "jane".to_string(),
                full_name: None,
                password_hash: "hash".to_string(),
                is_admin: false,
            })
            .await
            .unwrap();
        let subject = TokenSubject {
            user_id: user.id,
            email: user.email,
        };
        (
            RefreshAccessTokenHandler::new(users, tokens.clone()),
            tokens,
            subject,
        )
    }

    #[tokio::test]
    async fn refresh_token_yields_access_token() {
        let (handler, tokens, subject) = fixture().await;
        let refresh = tokens.issue(&subject, TokenKind::Refresh).unwrap();

        let access = handler
            .handle(RefreshAccessTokenCommand {
                refresh_token: refresh.token,
            })
            .await
            .unwrap();
        assert_eq!(access.kind, TokenKind::Access);
        assert_eq!(tokens.verify(&access.token).unwrap().subject, subject);
    }

    #[tokio::test]
    async fn access_token_cannot_refresh() {
        let (handler, tokens, subject) = fixture().await;
        let access = tokens.issue(&subject, TokenKind::Access).unwrap();

        assert!(matches!(
            handler
                .handle(RefreshAccessTokenCommand {
                    refresh_token: access.token
                })
                .await,
            Err(ServiceError::Auth(AuthError::InvalidToken))
        ));
    }
}
