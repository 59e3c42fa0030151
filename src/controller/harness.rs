//! # Task execution harness.
//!
//! Wraps one task factory invocation:
//! 1. build the scoped logger (`"{prefix} task {n}:"`) through the [`LogSink`];
//! 2. call the factory; `None` is a successful no-op;
//! 3. run the executable with a never-cancelled token and the shared [`Runtime`].
//!
//! A logger failure fails the task before its factory is consulted.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{
    controller::ControllerConfig,
    error::TaskError,
    events::Bus,
    logger::LogSink,
    runtime::Runtime,
    sequence::{Sequence, SequenceData},
    tasks::TaskSetupFn,
};

/// Everything a task unit needs, cheap to clone into spawned units.
#[derive(Clone)]
pub(crate) struct TaskHarness {
    pub(crate) cfg: Arc<ControllerConfig>,
    pub(crate) runtime: Runtime,
    pub(crate) sink: Arc<dyn LogSink>,
    pub(crate) bus: Bus,
}

impl TaskHarness {
    /// Runs the task at 1-based position `number`.
    pub(crate) async fn run_task(
        &self,
        number: usize,
        setup: &TaskSetupFn,
        sequence: Sequence,
        data: &SequenceData,
    ) -> Result<(), TaskError> {
        let log = self
            .sink
            .setup(&self.cfg.task_prefix(number), self.cfg.console)?;

        match setup(sequence, data) {
            Some(task) => {
                log.debug(format_args!("running {}", task.name()));
                task.spawn(CancellationToken::new(), log, self.runtime.clone())
                    .await
            }
            None => Ok(()),
        }
    }
}
