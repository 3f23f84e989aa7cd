//! HTTP adapter for registration, login and token refresh.

pub mod dto;
mod handlers;
mod routes;

pub use dto::{LoginRequest, RefreshRequest, TokenResponse};
pub use routes::auth_routes;
