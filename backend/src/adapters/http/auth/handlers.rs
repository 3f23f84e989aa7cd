//! HTTP handlers for authentication endpoints.

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::auth::{
    LoginCommand, RefreshAccessTokenCommand, RegisterUserCommand,
};
use crate::domain::foundation::AuthError;
use crate::domain::user::Registration;

use super::super::error::ApiError;
use super::super::middleware::RequireAuth;
use super::super::state::AppState;
use super::super::users::UserResponse;
use super::dto::{LoginRequest, RefreshRequest, TokenResponse};

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(registration): Json<Registration>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .register_user_handler()
        .handle(RegisterUserCommand { registration })
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tokens = state
        .login_handler()
        .handle(LoginCommand {
            email: request.email,
            password: request.password,
        })
        .await?;
    Ok(Json(TokenResponse::from(tokens)))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .users
        .find_by_id(caller.id)
        .await?
        .ok_or(AuthError::UserNotFound)?;
    Ok(Json(UserResponse::from(user)))
}

/// POST /api/v1/auth/refresh - exchanges a refresh token for a new access token
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let access = state
        .refresh_handler()
        .handle(RefreshAccessTokenCommand {
            refresh_token: request.refresh_token,
        })
        .await?;
    Ok(Json(TokenResponse::from(access)))
}
