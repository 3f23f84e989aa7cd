//! HTTP adapter - the axum REST surface.
//!
//! Each resource has its own `dto`/`handlers`/`routes` triple. Handlers
//! translate requests into application commands and map failures through
//! [`ApiError`].

pub mod auth;
mod dto;
pub mod email;
mod error;
mod health;
pub mod middleware;
pub mod plans;
mod router;
mod state;
pub mod stripe;
pub mod users;

pub use dto::{MessageResponse, SuccessResponse};
pub use error::{ApiError, ErrorResponse};
pub use router::{build_router, App};
pub use state::{AppInfo, AppState};
