//! Assembly of the full HTTP application.

use axum::http::HeaderValue;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::normalize_path::NormalizePath;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

use super::auth::auth_routes;
use super::email::email_routes;
use super::health::{api_root, health};
use super::middleware::auth_middleware;
use super::plans::plan_routes;
use super::state::AppState;
use super::stripe::stripe_routes;
use super::users::user_routes;

/// The served application: the router behind trailing-slash normalisation.
pub type App = NormalizePath<Router>;

/// Builds the application with every resource under `/api/v1`.
///
/// Layer order (outermost first): path normalisation, trace, CORS, timeout,
/// bearer-token auth. Normalisation wraps the router instead of being one of
/// its layers: the path must be rewritten before routing so that
/// `/api/v1/users/` and `/api/v1/users` reach the same handler.
pub fn build_router(state: AppState, server: &ServerConfig) -> App {
    let api = Router::new()
        .route("/", get(api_root))
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/plans", plan_routes())
        .nest("/stripe", stripe_routes())
        .nest("/email", email_routes());

    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(from_fn_with_state(state.sessions.clone(), auth_middleware))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(&server.cors_origins_list()))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    NormalizePath::trim_trailing_slash(router)
}

/// Any origin when none are configured; otherwise exactly the listed ones.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

