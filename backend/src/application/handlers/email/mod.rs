//! Account email handlers.

mod account_emails;

pub use account_emails::{
    SendPasswordResetCommand, SendPasswordResetHandler, SendVerificationCommand,
    SendVerificationHandler,
};
