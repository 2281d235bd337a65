//! Keeps projects, their stages, their kanban column and their linked task
//! consistent with each other.

pub mod plan;
pub mod propagate;
pub mod task_mirror;

pub use plan::PropagationError;
pub use propagate::{BoardOutcome, move_project_to_column, reconcile_project, set_stage_completed};
