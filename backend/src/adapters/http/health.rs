//! Liveness and API root endpoints.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use super::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub app: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub health: &'static str,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        app: state.info.name.clone(),
        version: state.info.version.clone(),
    })
}

/// GET /api/v1/
pub async fn api_root(State(state): State<AppState>) -> impl IntoResponse {
    Json(RootResponse {
        message: format!("Welcome to {}", state.info.name),
        health: "/health",
    })
}
