//! Domain layer - entities, value objects and validation rules.
//!
//! Nothing in here performs I/O. Collaborators are reached through the
//! traits in [`crate::ports`].

pub mod email;
pub mod foundation;
pub mod plan;
pub mod user;
