//! User domain: accounts and the inputs that create or modify them.

mod account;

pub use account::{normalize_email, validate_email, NewUser, Registration, User, UserUpdate};
