//! HTTP handlers for user endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::response::IntoResponse;

use crate::application::handlers::user::{SendWelcomeEmailCommand, UpdateUserCommand};
use crate::domain::foundation::{ErrorCode, Page, PageQuery, PageRequest, UserId};
use crate::domain::user::UserUpdate;

use super::super::error::ApiError;
use super::super::middleware::RequireAuth;
use super::super::state::AppState;
use super::super::dto::MessageResponse;
use super::dto::UserResponse;

fn user_not_found() -> ApiError {
    ApiError::not_found(ErrorCode::UserNotFound, "User not found")
}

/// GET /api/v1/users/ - paginated listing
pub async fn list_users(
    State(state): State<AppState>,
    RequireAuth(_caller): RequireAuth,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let request = PageRequest::from(query);
    let (users, total) = state.users.list(&request).await?;

    let page = Page::new(users, total, &request).map(UserResponse::from);
    Ok(Json(page))
}

/// GET /api/v1/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    RequireAuth(_caller): RequireAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let id = UserId::new(id).map_err(|_| user_not_found())?;
    let user = state.users.find_by_id(id).await?.ok_or_else(user_not_found)?;
    Ok(Json(UserResponse::from(user)))
}

/// PUT /api/v1/users/:id - partial update
pub async fn update_user(
    State(state): State<AppState>,
    RequireAuth(_caller): RequireAuth,
    Path(id): Path<i64>,
    Json(update): Json<UserUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = UserId::new(id).map_err(|_| user_not_found())?;
    let user = state
        .update_user_handler()
        .handle(UpdateUserCommand { user_id, update })
        .await?;
    Ok(Json(UserResponse::from(user)))
}

/// DELETE /api/v1/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let id = UserId::new(id).map_err(|_| user_not_found())?;
    if !state.users.delete(id).await? {
        return Err(user_not_found());
    }
    tracing::info!(user_id = %id, actor = %caller.id, "user deleted");
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// POST /api/v1/users/:id/send-welcome-email
pub async fn send_welcome_email(
    State(state): State<AppState>,
    RequireAuth(_caller): RequireAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = UserId::new(id).map_err(|_| user_not_found())?;
    state
        .welcome_email_handler()
        .handle(SendWelcomeEmailCommand { user_id })
        .await?;
    Ok(Json(MessageResponse::new("Welcome email sent successfully")))
}
