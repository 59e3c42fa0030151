//! # Task abstraction.
//!
//! A [`Task`] is the smallest unit of work in a sequence. It has a stable
//! [`name`](Task::name) and a [`spawn`](Task::spawn) method that creates a fresh
//! future per invocation. The future receives:
//! - a [`CancellationToken`] (the controller never cancels it; tasks may derive
//!   child tokens for their own timeouts),
//! - a [`TaskLogger`] scoped to the task's position in its phase,
//! - the shared [`Runtime`].
//!
//! # Example
//! ```
//! use tokio_util::sync::CancellationToken;
//! use seqvisor::{BoxTaskFuture, Runtime, Task, TaskLogger};
//!
//! struct SyncClock;
//!
//! impl Task for SyncClock {
//!     fn name(&self) -> &str { "sync-clock" }
//!
//!     fn spawn(&self, _ctx: CancellationToken, log: TaskLogger, _rt: Runtime) -> BoxTaskFuture {
//!         Box::pin(async move {
//!             log.info("clock synchronized");
//!             Ok(())
//!         })
//!     }
//! }
//! ```

use std::{future::Future, pin::Pin, sync::Arc};

use tokio_util::sync::CancellationToken;

use crate::{error::TaskError, logger::TaskLogger, runtime::Runtime};

/// Future returned by [`Task::spawn`].
pub type BoxTaskFuture = Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send + 'static>>;

/// Shared handle to a task.
pub type TaskRef = Arc<dyn Task>;

/// # Executable unit of work.
pub trait Task: Send + Sync + 'static {
    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Creates the future performing one execution of the task.
    fn spawn(&self, ctx: CancellationToken, log: TaskLogger, rt: Runtime) -> BoxTaskFuture;
}
