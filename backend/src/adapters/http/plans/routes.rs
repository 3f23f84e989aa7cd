//! Axum router for plan endpoints, mounted at `/api/v1/plans`.

use axum::routing::{get, post};
use axum::Router;

use super::super::state::AppState;
use super::handlers::{
    cancel_plan, create_plan, current_plan, delete_plan, get_plan, list_plans, plan_history,
    subscribe, update_plan,
};

/// Static `/user/*` segments take precedence over `/:id` in axum's matcher.
pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_plans).post(create_plan))
        .route("/:id", get(get_plan).put(update_plan).delete(delete_plan))
        .route("/subscribe/:id", post(subscribe))
        .route("/user/current", get(current_plan))
        .route("/user/cancel", post(cancel_plan))
        .route("/user/history", get(plan_history))
}
