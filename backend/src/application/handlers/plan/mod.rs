//! Plan catalogue and user plan handlers.

mod create_plan;
mod subscribe_to_plan;
mod update_plan;

pub use create_plan::{CreatePlanCommand, CreatePlanHandler};
pub use subscribe_to_plan::{
    CancelUserPlanCommand, CancelUserPlanHandler, SubscribeToPlanCommand, SubscribeToPlanHandler,
};
pub use update_plan::{DeletePlanCommand, DeletePlanHandler, UpdatePlanCommand, UpdatePlanHandler};
