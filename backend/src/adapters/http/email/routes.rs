//! Axum router for email endpoints, mounted at `/api/v1/email`.

use axum::routing::post;
use axum::Router;

use super::super::state::AppState;
use super::handlers::{
    send_bulk, send_email, send_password_reset, send_template, send_verification, send_welcome,
};

pub fn email_routes() -> Router<AppState> {
    Router::new()
        .route("/send", post(send_email))
        .route("/welcome/:user_id", post(send_welcome))
        .route("/password-reset/:email", post(send_password_reset))
        .route("/verification/:user_id", post(send_verification))
        .route("/template", post(send_template))
        .route("/bulk", post(send_bulk))
}
