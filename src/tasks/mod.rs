//! # Task abstractions and phases.
//!
//! - [`Task`] - trait for executable units of work
//! - [`TaskFn`] - closure-backed task implementation
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn Task>`)
//! - [`TaskSetupFn`] - task factory keyed on sequence and payload
//! - [`Phase`] - ordered group of factories run concurrently

mod phase;
mod task;
mod task_fn;

pub use phase::{Phase, TaskSetupFn};
pub use task::{BoxTaskFuture, Task, TaskRef};
pub use task_fn::TaskFn;
