//! # Function-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: Fn(CancellationToken, TaskLogger, Runtime) -> Fut`,
//! producing a fresh future per spawn. Shared state between invocations must be
//! made explicit with `Arc<...>` inside the closure.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use seqvisor::{Runtime, TaskError, TaskFn, TaskLogger, TaskRef};
//!
//! let t: TaskRef = TaskFn::arc("mount-state", |_ctx: CancellationToken, log: TaskLogger, _rt: Runtime| async move {
//!     log.info("mounted");
//!     Ok::<_, TaskError>(())
//! });
//!
//! assert_eq!(t.name(), "mount-state");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::logger::TaskLogger;
use crate::runtime::Runtime;
use crate::tasks::task::{BoxTaskFuture, Task};

/// Function-backed task implementation.
pub struct TaskFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new function-backed task.
    ///
    /// Prefer [`TaskFn::arc`] when you immediately need a [`TaskRef`](crate::TaskRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the task and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> fmt::Debug for TaskFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskFn").field("name", &self.name).finish()
    }
}

impl<F, Fut> Task for TaskFn<F>
where
    F: Fn(CancellationToken, TaskLogger, Runtime) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn spawn(&self, ctx: CancellationToken, log: TaskLogger, rt: Runtime) -> BoxTaskFuture {
        Box::pin((self.f)(ctx, log, rt))
    }
}
