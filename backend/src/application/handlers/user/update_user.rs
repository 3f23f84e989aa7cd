//! UpdateUserHandler - partial account updates.

use std::sync::Arc;

use crate::application::ServiceError;
use crate::domain::foundation::{ErrorCode, UserId};
use crate::domain::user::{User, UserUpdate};
use crate::ports::UserRepository;

#[derive(Debug, Clone)]
pub struct UpdateUserCommand {
    pub user_id: UserId,
    pub update: UserUpdate,
}

pub struct UpdateUserHandler {
    users: Arc<dyn UserRepository>,
}

impl UpdateUserHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, cmd: UpdateUserCommand) -> Result<User, ServiceError> {
        cmd.update.validate()?;

        self.users
            .update(cmd.user_id, &cmd.update)
            .await?
            .ok_or_else(|| ServiceError::not_found(ErrorCode::UserNotFound, "User not found"))
    }
}
