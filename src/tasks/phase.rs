//! # Phases and task factories.
//!
//! A [`Phase`] is an ordered list of task factories ([`TaskSetupFn`]). A factory
//! is called with the running [`Sequence`] and its [`SequenceData`] and decides
//! whether work is needed: returning `None` is a silent, successful skip.
//!
//! Phases of a sequence run strictly one after another; the tasks of a phase run
//! concurrently. Cloning a phase clones the factory handles, so planning the
//! same sequence twice yields structurally equal phase lists.
//!
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use seqvisor::{Phase, Runtime, Sequence, SequenceData, TaskError, TaskFn, TaskLogger};
//!
//! let unmount = TaskFn::arc("unmount", |_c: CancellationToken, _l: TaskLogger, _r: Runtime| async {
//!     Ok::<_, TaskError>(())
//! });
//!
//! let phase = Phase::new()
//!     .with_task(unmount)
//!     .with_setup(|seq: Sequence, _data: &SequenceData| {
//!         // Only the reset sequence wipes disks.
//!         (seq == Sequence::Reset).then(|| {
//!             TaskFn::arc("wipe", |_c: CancellationToken, _l: TaskLogger, _r: Runtime| async {
//!                 Ok::<_, TaskError>(())
//!             }) as seqvisor::TaskRef
//!         })
//!     });
//!
//! assert_eq!(phase.len(), 2);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::sequence::{Sequence, SequenceData};
use crate::tasks::task::TaskRef;

/// Task factory: builds the executable for a sequence run, or `None` to skip.
pub type TaskSetupFn = Arc<dyn Fn(Sequence, &SequenceData) -> Option<TaskRef> + Send + Sync>;

/// Ordered group of task factories executed concurrently.
#[derive(Clone, Default)]
pub struct Phase {
    tasks: Vec<TaskSetupFn>,
}

impl Phase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a factory.
    pub fn with_setup<F>(mut self, setup: F) -> Self
    where
        F: Fn(Sequence, &SequenceData) -> Option<TaskRef> + Send + Sync + 'static,
    {
        self.tasks.push(Arc::new(setup));
        self
    }

    /// Appends a task that runs unconditionally.
    pub fn with_task(self, task: TaskRef) -> Self {
        self.with_setup(move |_, _| Some(Arc::clone(&task)))
    }

    /// Appends an already shared factory.
    pub fn push(&mut self, setup: TaskSetupFn) {
        self.tasks.push(setup);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskSetupFn> {
        self.tasks.iter()
    }
}

impl FromIterator<TaskRef> for Phase {
    fn from_iter<I: IntoIterator<Item = TaskRef>>(iter: I) -> Self {
        iter.into_iter().fold(Phase::new(), Phase::with_task)
    }
}

impl fmt::Debug for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Phase").field("tasks", &self.tasks.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::{Runtime, TaskError, TaskFn, TaskLogger};

    fn noop(name: &'static str) -> TaskRef {
        TaskFn::arc(name, |_c: CancellationToken, _l: TaskLogger, _r: Runtime| async {
            Ok::<_, TaskError>(())
        })
    }

    #[test]
    fn factories_keep_insertion_order() {
        let phase: Phase = [noop("a"), noop("b"), noop("c")].into_iter().collect();
        let names: Vec<String> = phase
            .iter()
            .filter_map(|setup| setup(Sequence::Boot, &SequenceData::None))
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn factory_may_skip() {
        let phase = Phase::new().with_setup(|seq, data| {
            data.as_upgrade()
                .filter(|_| seq == Sequence::Upgrade)
                .map(|_| noop("stage-image"))
        });

        let setup = phase.iter().next().unwrap();
        assert!(setup(Sequence::Upgrade, &SequenceData::None).is_none());
        assert!(
            setup(
                Sequence::Upgrade,
                &SequenceData::Upgrade(crate::UpgradeRequest::new("img"))
            )
            .is_some()
        );
    }
}
