//! HTTP middleware for axum.
//!
//! - `auth` - bearer token validation and the `RequireAuth`/`RequireAdmin` extractors

pub mod auth;

pub use auth::{auth_middleware, AuthRejection, AuthState, RequireAdmin, RequireAuth};
