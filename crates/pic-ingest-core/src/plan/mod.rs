pub mod job;
pub mod planner;

pub use job::{compile_jobs, Job, Plan};
pub use planner::destination_for;
