//! HTTP adapter for the plan catalogue and user subscriptions to it.

pub mod dto;
mod handlers;
mod routes;

pub use dto::{PlanListQuery, PlanResponse, UserPlanResponse};
pub use routes::plan_routes;
