//! In-memory repository adapters.
//!
//! Back the `memory://` database URL and the HTTP integration tests. Data is
//! lost when the process exits.

mod plan_repository;
mod subscription_repository;
mod user_repository;

pub use plan_repository::InMemoryPlanRepository;
pub use subscription_repository::InMemorySubscriptionRepository;
pub use user_repository::InMemoryUserRepository;
