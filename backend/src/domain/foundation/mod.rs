//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, pagination and error types
//! that form the vocabulary of the API.

mod auth;
mod errors;
mod ids;
mod pagination;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{PlanId, UserId, UserPlanId};
pub use pagination::{
    page_count, Page, PageQuery, PageRequest, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use timestamp::Timestamp;
