//! Axum router for user endpoints, mounted at `/api/v1/users`.

use axum::routing::{get, post};
use axum::Router;

use super::super::state::AppState;
use super::handlers::{delete_user, get_user, list_users, send_welcome_email, update_user};

/// - `GET /` - paginated listing
/// - `GET|PUT|DELETE /:id`
/// - `POST /:id/send-welcome-email`
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/:id/send-welcome-email", post(send_welcome_email))
}
