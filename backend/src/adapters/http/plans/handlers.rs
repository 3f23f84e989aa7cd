//! HTTP handlers for the plan catalogue and the caller's own plan.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::plan::{
    CancelUserPlanCommand, CreatePlanCommand, DeletePlanCommand, SubscribeToPlanCommand,
    UpdatePlanCommand,
};
use crate::domain::foundation::{ErrorCode, Page, PageQuery, PageRequest, PlanId};
use crate::domain::plan::{PlanCreate, PlanUpdate};

use super::super::dto::MessageResponse;
use super::super::error::ApiError;
use super::super::middleware::{RequireAdmin, RequireAuth};
use super::super::state::AppState;
use super::dto::{PlanListQuery, PlanResponse, UserPlanResponse};

fn plan_not_found() -> ApiError {
    ApiError::not_found(ErrorCode::PlanNotFound, "Plan not found")
}

fn plan_id(raw: i64) -> Result<PlanId, ApiError> {
    PlanId::new(raw).map_err(|_| plan_not_found())
}

// ════════════════════════════════════════════════════════════════════════════════
// Catalogue
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/v1/plans/
pub async fn list_plans(
    State(state): State<AppState>,
    Query(query): Query<PlanListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let plans = state.plans.list(query.active_only()).await?;
    let body: Vec<PlanResponse> = plans.into_iter().map(PlanResponse::from).collect();
    Ok(Json(body))
}

/// GET /api/v1/plans/:id
pub async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let plan = state
        .plans
        .find_by_id(plan_id(id)?)
        .await?
        .ok_or_else(plan_not_found)?;
    Ok(Json(PlanResponse::from(plan)))
}

/// POST /api/v1/plans/ (admin)
pub async fn create_plan(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Json(plan): Json<PlanCreate>,
) -> Result<impl IntoResponse, ApiError> {
    let plan = state
        .create_plan_handler()
        .handle(CreatePlanCommand { actor, plan })
        .await?;
    Ok((StatusCode::CREATED, Json(PlanResponse::from(plan))))
}

/// PUT /api/v1/plans/:id (admin)
pub async fn update_plan(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<i64>,
    Json(update): Json<PlanUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let plan = state
        .update_plan_handler()
        .handle(UpdatePlanCommand {
            actor,
            plan_id: plan_id(id)?,
            update,
        })
        .await?;
    Ok(Json(PlanResponse::from(plan)))
}

/// DELETE /api/v1/plans/:id (admin)
pub async fn delete_plan(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .delete_plan_handler()
        .handle(DeletePlanCommand {
            actor,
            plan_id: plan_id(id)?,
        })
        .await?;
    Ok(Json(MessageResponse::new("Plan deleted successfully")))
}

// ════════════════════════════════════════════════════════════════════════════════
// Caller's plan
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/plans/subscribe/:id
pub async fn subscribe(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user_plan = state
        .subscribe_handler()
        .handle(SubscribeToPlanCommand {
            user_id: caller.id,
            plan_id: plan_id(id)?,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UserPlanResponse::from(user_plan))))
}

/// GET /api/v1/plans/user/current
pub async fn current_plan(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let user_plan = state
        .subscriptions
        .find_active(caller.id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(ErrorCode::SubscriptionNotFound, "No active plan found")
        })?;
    Ok(Json(UserPlanResponse::from(user_plan)))
}

/// POST /api/v1/plans/user/cancel
pub async fn cancel_plan(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    state
        .cancel_plan_handler()
        .handle(CancelUserPlanCommand { user_id: caller.id })
        .await?;
    Ok(Json(MessageResponse::new("Plan cancelled successfully")))
}

/// GET /api/v1/plans/user/history - newest first, paginated
pub async fn plan_history(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let request = PageRequest::from(query);
    let (rows, total) = state.subscriptions.history(caller.id, &request).await?;
    Ok(Json(
        Page::new(rows, total, &request).map(UserPlanResponse::from),
    ))
}
