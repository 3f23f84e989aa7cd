//! Application handlers.
//!
//! One command per write operation, grouped by area.

pub mod auth;
pub mod billing;
pub mod email;
pub mod plan;
pub mod user;
