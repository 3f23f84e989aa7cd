//! SendWelcomeEmailHandler - greets an existing account by email.

use std::sync::Arc;

use crate::application::ServiceError;
use crate::domain::foundation::{ErrorCode, UserId};
use crate::ports::{EmailSender, UserRepository};

#[derive(Debug, Clone)]
pub struct SendWelcomeEmailCommand {
    pub user_id: UserId,
}

pub struct SendWelcomeEmailHandler {
    users: Arc<dyn UserRepository>,
    email: Arc<dyn EmailSender>,
}

impl SendWelcomeEmailHandler {
    pub fn new(users: Arc<dyn UserRepository>, email: Arc<dyn EmailSender>) -> Self {
        Self { users, email }
    }

    pub async fn handle(&self, cmd: SendWelcomeEmailCommand) -> Result<(), ServiceError> {
        let user = self
            .users
            .find_by_id(cmd.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ErrorCode::UserNotFound, "User not found"))?;

        self.email
            .send_welcome(&user.email, user.greeting_name())
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "welcome email failed");
                e
            })?;

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
    use crate::ports::EmailError;

    async fn fixture() -> (SendWelcomeEmailHandler, RecordingEmailSender, UserId) {
        let users = Arc::new(InMemoryUserRepository::new());
        let user = users
            .create(NewUser {
                email: "jane@example.com".to_string(),
                username: "jane".to_string(),
                full_name: Some("Jane".to_string()),
                password_hash: "hash".to_string(),
                is_admin: false,
            })
            .await
            .unwrap();
        let outbox = RecordingEmailSender::new(Branding::new("R Firm", "http://localhost:3000"));
        let handler = SendWelcomeEmailHandler::new(users, Arc::new(outbox.clone()));
        (handler, outbox, user.id)
    }

    #[tokio::test]
    async fn sends_to_the_account_address() {
        let (handler, outbox, id) = fixture().await;
        handler
            .handle(SendWelcomeEmailCommand { user_id: id })
            .await
            .unwrap();

        let sent = outbox.last_sent().unwrap();
        assert_eq!(sent.to, "jane@example.com");
        assert!(sent.body.contains("Jane"));
    }

    #[tokio::test]
    async fn unknown_user_sends_nothing() {
        let (handler, outbox, _) = fixture().await;
        assert!(handler
            .handle(SendWelcomeEmailCommand {
                user_id: UserId::new(99).unwrap()
            })
            .await
            .is_err());
        assert!(outbox.sent().is_empty());
    }

    #[tokio::test]
    async fn delivery_failure_surfaces_as_email_error() {
        let (handler, outbox, id) = fixture().await;
        outbox.fail_all(EmailError::Transport("down".to_string()));

        assert!(matches!(
            handler.handle(SendWelcomeEmailCommand { user_id: id }).await,
            Err(ServiceError::Email(_))
        ));
    }
}
