//! Authentication middleware and extractors for axum.
//!
//! ```text
//! Request → auth_middleware → injects AuthenticatedUser into extensions
//!                                      ↓
//!                   Handler → RequireAuth / RequireAdmin read from extensions
//! ```
//!
//! Requests without an `Authorization` header pass through untouched, so
//! public routes share the same stack. A header that is present but invalid
//! is rejected immediately.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

use super::super::error::{ApiError, ErrorResponse};

/// Auth middleware state - wraps the session validator.
pub type AuthState = Arc<dyn SessionValidator>;

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Validates a bearer token, when one is sent, and stores the caller.
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let outcome = match bearer_token(&request) {
        Some(token) => validator.validate(token).await,
        None => return next.run(request).await,
    };

    match outcome {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            if let AuthError::ServiceUnavailable(_) = &e {
                tracing::error!(error = %e, "session validation failed");
            } else {
                tracing::debug!(error = %e, "bearer token rejected");
            }
            ApiError::from(e).into_response()
        }
    }
}

/// Extractor that requires an authenticated caller.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(RequireAuth)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

/// Extractor that requires an authenticated administrator.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(AuthRejection::Forbidden);
        }
        Ok(RequireAdmin(user))
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No valid bearer token was provided.
    Unauthenticated,
    /// Authenticated, but not an administrator.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AuthRejection::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("UNAUTHENTICATED", "Authentication required"),
            ),
            AuthRejection::Forbidden => (
                StatusCode::FORBIDDEN,
                ErrorResponse::new("FORBIDDEN", "Admin access required"),
            ),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionValidator;
    use crate::domain::foundation::UserId;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn user(is_admin: bool) -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new(1).unwrap(),
            "test@example.com",
            Some("Test User".to_string()),
            is_admin,
        )
    }

    fn parts_with(user: Option<AuthenticatedUser>) -> Parts {
        let mut request = axum::http::Request::builder()
            .uri("/test")
            .body(())
            .unwrap();
        if let Some(user) = user {
            request.extensions_mut().insert(user);
        }
        request.into_parts().0
    }

    #[tokio::test]
    async fn require_auth_extracts_user_from_extensions() {
        let mut parts = parts_with(Some(user(false)));
        let RequireAuth(found) = RequireAuth::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(found.email, "test@example.com");
    }

    #[tokio::test]
    async fn require_auth_fails_without_user() {
        let mut parts = parts_with(None);
        let result = RequireAuth::from_request_parts(&mut parts, &()).await;
        assert_eq!(result.unwrap_err(), AuthRejection::Unauthenticated);
    }

    #[tokio::test]
    async fn require_admin_distinguishes_403_from_401() {
        let mut parts = parts_with(Some(user(false)));
        assert_eq!(
            RequireAdmin::from_request_parts(&mut parts, &())
                .await
                .unwrap_err(),
            AuthRejection::Forbidden
        );

        let mut parts = parts_with(None);
        assert_eq!(
            RequireAdmin::from_request_parts(&mut parts, &())
                .await
                .unwrap_err(),
            AuthRejection::Unauthenticated
        );

        let mut parts = parts_with(Some(user(true)));
        assert!(RequireAdmin::from_request_parts(&mut parts, &()).await.is_ok());
    }

    async fn whoami(RequireAuth(user): RequireAuth) -> String {
        user.email
    }

    fn app() -> Router {
        let validator: AuthState =
            Arc::new(MockSessionValidator::new().with_user("good", user(false)));
        Router::new()
            .route("/me", get(whoami))
            .route("/open", get(|| async { "open" }))
            .layer(middleware::from_fn_with_state(validator, auth_middleware))
    }

    fn request(path: &str, token: Option<&str>) -> axum::http::Request<Body> {
        let mut builder = axum::http::Request::builder().uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn middleware_injects_user_for_valid_token() {
        let response = app().oneshot(request("/me", Some("good"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn middleware_rejects_invalid_token() {
        let response = app().oneshot(request("/open", Some("bad"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_token_reaches_public_routes_only() {
        let open = app().oneshot(request("/open", None)).await.unwrap();
        assert_eq!(open.status(), StatusCode::OK);

        let me = app().oneshot(request("/me", None)).await.unwrap();
        assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
    }
}
