//! Authentication command handlers.

mod login;
mod refresh_access_token;
mod register_user;

pub use login::{LoginCommand, LoginHandler, TokenPair};
pub use refresh_access_token::{RefreshAccessTokenCommand, RefreshAccessTokenHandler};
pub use register_user::{RegisterUserCommand, RegisterUserHandler};
