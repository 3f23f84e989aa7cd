//! RegisterUserHandler - Command handler for creating accounts.

use std::sync::Arc;

use crate::application::ServiceError;
use crate::domain::user::{NewUser, Registration, User};
use crate::ports::{PasswordHasher, UserRepository};

/// Command to register a new account.
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    pub registration: Registration,
}

pub struct RegisterUserHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl RegisterUserHandler {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    pub async fn handle(&self, cmd: RegisterUserCommand) -> Result<User, ServiceError> {
        cmd.registration.validate()?;

        let password_hash = self.hasher.hash(&cmd.registration.password).await?;
        let user = self
            .users
            .create(NewUser::from_registration(cmd.registration, password_hash))
            .await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::BcryptPasswordHasher;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::foundation::ErrorCode;

    fn handler() -> (RegisterUserHandler, Arc<InMemoryUserRepository>) {
        let users = Arc::new(InMemoryUserRepository::new());
        let handler =
            RegisterUserHandler::new(users.clone(), Arc::new(BcryptPasswordHasher::new(4)));
        (handler, users)
    }

    fn registration(email: &str, username: &str) -> RegisterUserCommand {
        RegisterUserCommand {
            registration: Registration {
                email: email.to_string(),
                username: username.to_string(),
                password: "correct-horse".to_string(),
                full_name: Some("Jane Doe".to_string()),
            },
        }
    }

    #[tokio::test]
    async fn registers_with_hashed_password() {
        let (handler, users) = handler();
        let user = handler
            .handle(registration("Jane@Example.com", "jane"))
            .await
            .unwrap();

        assert_eq!(user.email, "jane@example.com");
        assert_ne!(user.password_hash, "correct-horse");
        assert!(user.is_active);
        assert!(!user.is_admin);
        assert_eq!(users.count().await, 1);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (handler, _) = handler();
        handler
            .handle(registration("jane@example.com", "jane"))
            .await
            .unwrap();

        let err = handler
            .handle(registration("JANE@example.com", "jane2"))
            .await
            .unwrap_err();
        match err {
            ServiceError::Domain(e) => assert_eq!(e.code, ErrorCode::AlreadyExists),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn invalid_registration_never_reaches_storage() {
        let (handler, users) = handler();
        let mut cmd = registration("jane@example.com", "jane");
        cmd.registration.password = "short".to_string();

        assert!(matches!(
            handler.handle(cmd).await,
            Err(ServiceError::Domain(_))
        ));
        assert_eq!(users.count().await, 0);
    }
}
