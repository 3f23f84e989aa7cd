//! HTTP adapter for user management.

pub mod dto;
mod handlers;
mod routes;

pub use dto::UserResponse;
pub use routes::user_routes;
