//! Axum router for authentication endpoints, mounted at `/api/v1/auth`.

use axum::routing::{get, post};
use axum::Router;

use super::super::state::AppState;
use super::handlers::{login, me, refresh, register};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/refresh", post(refresh))
}
