//! User account command handlers.

mod send_welcome_email;
mod update_user;

pub use send_welcome_email::{SendWelcomeEmailCommand, SendWelcomeEmailHandler};
pub use update_user::{UpdateUserCommand, UpdateUserHandler};
