//! Password reset and email verification messages.
//!
//! Tokens are random and single-purpose; they are only delivered, not stored.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::ServiceError;
use crate::domain::foundation::{ErrorCode, UserId};
use crate::domain::user::{normalize_email, validate_email};
use crate::ports::{EmailSender, UserRepository};

fn random_token() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Clone)]
pub struct SendPasswordResetCommand {
    pub email: String,
}

pub struct SendPasswordResetHandler {
    email: Arc<dyn EmailSender>,
}

impl SendPasswordResetHandler {
    pub fn new(email: Arc<dyn EmailSender>) -> Self {
        Self { email }
    }

    /// Sends regardless of whether an account exists, so the endpoint
    /// cannot be used to discover registered addresses.
    pub async fn handle(&self, cmd: SendPasswordResetCommand) -> Result<(), ServiceError> {
        validate_email(&cmd.email)?;
        let address = normalize_email(&cmd.email);

        self.email
            .send_password_reset(&address, &random_token())
            .await?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SendVerificationCommand {
    pub user_id: UserId,
}

pub struct SendVerificationHandler {
    users: Arc<dyn UserRepository>,
    email: Arc<dyn EmailSender>,
}

impl SendVerificationHandler {
    pub fn new(users: Arc<dyn UserRepository>, email: Arc<dyn EmailSender>) -> Self {
        Self { users, email }
    }

    pub async fn handle(&self, cmd: SendVerificationCommand) -> Result<(), ServiceError> {
        let user = self
            .users
            .find_by_id(cmd.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ErrorCode::UserNotFound, "User not found"))?;

        self.email
            .send_verification(&user.email, &random_token())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::email::RecordingEmailSender;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::email::Branding;
    use crate::domain::user::NewUser;

    fn outbox() -> RecordingEmailSender {
        RecordingEmailSender::new(Branding::new("R Firm", "https://app.example.com"))
    }

    #[test]
    fn tokens_are_unique_and_url_safe() {
        let a = random_token();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, random_token());
    }

    #[tokio::test]
    async fn password_reset_goes_to_normalized_address() {
        let outbox = outbox();
        SendPasswordResetHandler::new(Arc::new(outbox.clone()))
            .handle(SendPasswordResetCommand {
                email: "Jane@Example.com".to_string(),
            })
            .await
            .unwrap();

        let sent = outbox.last_sent().unwrap();
        assert_eq!(sent.to, "jane@example.com");
        assert!(sent.body.contains("https://app.example.com/reset-password?token="));
    }

    #[tokio::test]
    async fn password_reset_rejects_malformed_address() {
        let outbox = outbox();
        assert!(SendPasswordResetHandler::new(Arc::new(outbox.clone()))
            .handle(SendPasswordResetCommand {
                email: "nope".to_string()
            })
            .await
            .is_err());
        assert!(outbox.sent().is_empty());
    }

    #[tokio::test]
    async fn verification_needs_existing_user() {
        let users = Arc::new(InMemoryUserRepository::new());
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
        let outbox = outbox();
        let handler = SendVerificationHandler::new(users, Arc::new(outbox.clone()));

        handler
            .handle(SendVerificationCommand { user_id: user.id })
            .await
            .unwrap();
        assert!(outbox
            .last_sent()
            .unwrap()
            .body
            .contains("/verify-email?token="));

        assert!(handler
            .handle(SendVerificationCommand {
                user_id: UserId::new(42).unwrap()
            })
            .await
            .is_err());
    }
}
