//! Application layer - Commands, Queries, and Handlers.
//!
//! Handlers orchestrate domain rules and ports. Plain reads that need no
//! orchestration go straight from the HTTP layer to a port.

mod error;
pub mod handlers;

pub use error::ServiceError;
