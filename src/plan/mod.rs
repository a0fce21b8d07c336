mod builder;
mod file;
mod types;

pub use builder::build_plan;
pub use file::ScopedPlanFile;
pub use types::{Plan, PlanAction, PlanEntry};
