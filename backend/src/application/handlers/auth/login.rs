//! LoginHandler - exchanges credentials for an access/refresh token pair.

use std::sync::Arc;

use crate::application::ServiceError;
use crate::domain::foundation::AuthError;
use crate::domain::user::normalize_email;
use crate::ports::{IssuedToken, PasswordHasher, TokenKind, TokenService, TokenSubject, UserRepository};

#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// Tokens handed out on login.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

pub struct LoginHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl LoginHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Unknown email, wrong password and inactive account all fail the same
    /// way so callers cannot probe which accounts exist.
    pub async fn handle(&self, cmd: LoginCommand) -> Result<TokenPair, ServiceError> {
        let user = self
            .users
            .find_by_email(&normalize_email(&cmd.email))
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.hasher.verify(&cmd.password, &user.password_hash).await? {
            tracing::warn!(user_id = %user.id, "login with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }
        if !user.is_active {
            tracing::warn!(user_id = %user.id, "login to inactive account");
            return Err(AuthError::InvalidCredentials.into());
        }

        let subject = TokenSubject {
            user_id: user.id,
            email: user.email,
        };
        let access = self.tokens.issue(&subject, TokenKind::Access)?;
        let refresh = self.tokens.issue(&subject, TokenKind::Refresh)?;

        tracing::info!(user_id = %subject.user_id, "user logged in");
        Ok(TokenPair { access, refresh })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::{BcryptPasswordHasher, JwtTokenService};
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::user::{NewUser, UserUpdate};
    use secrecy::Secret;

    struct Fixture {
        users: Arc<InMemoryUserRepository>,
        tokens: Arc<JwtTokenService>,
        handler: LoginHandler,
    }

    async fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(BcryptPasswordHasher::new(4));
        let tokens = Arc::new(JwtTokenService::new(
            &Secret::new("login-test-secret".to_string()),
            "saas-api",
            1800,
            3600,
        ));
        users
            .create(NewUser {
                email: "jane@example.com".to_string(),
                username: "jane".to_string(),
                full_name: None,
                password_hash: hasher.hash("correct-horse").await.unwrap(),
                is_admin: false,
            })
            .await
            .unwrap();
        let handler = LoginHandler::new(users.clone(), hasher, tokens.clone());
        Fixture {
            users,
            tokens,
            handler,
        }
    }

    fn login(email: &str, password: &str) -> LoginCommand {
        LoginCommand {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn valid_credentials_yield_both_tokens() {
        let f = fixture().await;
        let pair = f
            .handler
            .handle(login(" JANE@example.com ", "correct-horse"))
            .await
            .unwrap();

        assert_eq!(pair.access.kind, TokenKind::Access);
        assert_eq!(pair.refresh.kind, TokenKind::Refresh);
        let claims = f.tokens.verify(&pair.access.token).unwrap();
        assert_eq!(claims.subject.email, "jane@example.com");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let f = fixture().await;
        for cmd in [
            login("jane@example.com", "wrong-password"),
            login("nobody@example.com", "correct-horse"),
        ] {
            assert!(matches!(
                f.handler.handle(cmd).await,
                Err(ServiceError::Auth(AuthError::InvalidCredentials))
            ));
        }
    }

    #[tokio::test]
    async fn inactive_account_cannot_log_in() {
        let f = fixture().await;
        let user = f
            .users
            .find_by_email("jane@example.com")
            .await
            .unwrap()
            .unwrap();
        f.users
            .update(
                user.id,
                &UserUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(matches!(
            f.handler
                .handle(login("jane@example.com", "correct-horse"))
                .await,
            Err(ServiceError::Auth(AuthError::InvalidCredentials))
        ));
    }
}
