//! # Sequencer: pure planner from sequence requests to phases.
//!
//! A [`Sequencer`] knows, for every [`Sequence`], which phases to run given the
//! [`Runtime`]. [`plan`] is the single dispatch point used by the controller: it
//! validates the payload (once, before any task runs) and calls the matching
//! method.
//!
//! ## Rules
//! - Boot, Initialize, Install, Shutdown and Reboot ignore the payload.
//! - Upgrade requires [`SequenceData::Upgrade`], Reset requires
//!   [`SequenceData::Reset`]; anything else is
//!   [`ControllerError::InvalidSequenceData`] and no phases.
//! - Planning has no side effects.
//!
//! [`SequenceTable`] is a closure-backed sequencer for wiring concrete task sets.
//!
//! ```rust
//! use seqvisor::{Phase, Runtime, Sequence, SequenceData, SequenceTable, State, plan};
//!
//! let table = SequenceTable::new()
//!     .on(Sequence::Boot, |_rt, _data| vec![Phase::new(), Phase::new()]);
//! let rt = Runtime::new(None, State::default());
//!
//! let phases = plan(&table, Sequence::Boot, &rt, &SequenceData::None).unwrap();
//! assert_eq!(phases.len(), 2);
//! assert!(plan(&table, Sequence::Shutdown, &rt, &SequenceData::None).unwrap().is_empty());
//! assert!(plan(&table, Sequence::Upgrade, &rt, &SequenceData::None).is_err());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ControllerError;
use crate::runtime::Runtime;
use crate::sequence::{ResetRequest, Sequence, SequenceData, UpgradeRequest};
use crate::tasks::Phase;

/// Produces the phase plan of each sequence.
pub trait Sequencer: Send + Sync + 'static {
    fn boot(&self, rt: &Runtime) -> Vec<Phase>;
    fn initialize(&self, rt: &Runtime) -> Vec<Phase>;
    fn install(&self, rt: &Runtime) -> Vec<Phase>;
    fn shutdown(&self, rt: &Runtime) -> Vec<Phase>;
    fn reboot(&self, rt: &Runtime) -> Vec<Phase>;
    fn upgrade(&self, rt: &Runtime, req: &UpgradeRequest) -> Vec<Phase>;
    fn reset(&self, rt: &Runtime, req: &ResetRequest) -> Vec<Phase>;
}

/// Resolves `sequence` into its phases, validating the payload first.
pub fn plan<S: Sequencer + ?Sized>(
    sequencer: &S,
    sequence: Sequence,
    rt: &Runtime,
    data: &SequenceData,
) -> Result<Vec<Phase>, ControllerError> {
    let invalid = || ControllerError::InvalidSequenceData {
        sequence,
        expected: sequence.expected_data(),
        got: data.tag(),
    };

    let phases = match sequence {
        Sequence::Boot => sequencer.boot(rt),
        Sequence::Initialize => sequencer.initialize(rt),
        Sequence::Install => sequencer.install(rt),
        Sequence::Shutdown => sequencer.shutdown(rt),
        Sequence::Reboot => sequencer.reboot(rt),
        Sequence::Upgrade => sequencer.upgrade(rt, data.as_upgrade().ok_or_else(invalid)?),
        Sequence::Reset => sequencer.reset(rt, data.as_reset().ok_or_else(invalid)?),
    };

    Ok(phases)
}

type PlanFn = Arc<dyn Fn(&Runtime, &SequenceData) -> Vec<Phase> + Send + Sync>;

/// Closure-backed [`Sequencer`].
///
/// Each registered closure receives the runtime and the (already validated)
/// payload. Sequences without a closure plan no phases.
#[derive(Clone, Default)]
pub struct SequenceTable {
    plans: HashMap<Sequence, PlanFn>,
}

impl SequenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the planner for `sequence`, replacing any previous one.
    pub fn on<F>(mut self, sequence: Sequence, plan: F) -> Self
    where
        F: Fn(&Runtime, &SequenceData) -> Vec<Phase> + Send + Sync + 'static,
    {
        self.plans.insert(sequence, Arc::new(plan));
        self
    }

    /// Registers a fixed phase list for `sequence`.
    pub fn with_phases(self, sequence: Sequence, phases: Vec<Phase>) -> Self {
        self.on(sequence, move |_, _| phases.clone())
    }

    /// Whether a planner is registered for `sequence`.
    pub fn contains(&self, sequence: Sequence) -> bool {
        self.plans.contains_key(&sequence)
    }

    fn phases(&self, sequence: Sequence, rt: &Runtime, data: &SequenceData) -> Vec<Phase> {
        self.plans
            .get(&sequence)
            .map(|plan| plan(rt, data))
            .unwrap_or_default()
    }
}

impl Sequencer for SequenceTable {
    fn boot(&self, rt: &Runtime) -> Vec<Phase> {
        self.phases(Sequence::Boot, rt, &SequenceData::None)
    }

    fn initialize(&self, rt: &Runtime) -> Vec<Phase> {
        self.phases(Sequence::Initialize, rt, &SequenceData::None)
    }

    fn install(&self, rt: &Runtime) -> Vec<Phase> {
        self.phases(Sequence::Install, rt, &SequenceData::None)
    }

    fn shutdown(&self, rt: &Runtime) -> Vec<Phase> {
        self.phases(Sequence::Shutdown, rt, &SequenceData::None)
    }

    fn reboot(&self, rt: &Runtime) -> Vec<Phase> {
        self.phases(Sequence::Reboot, rt, &SequenceData::None)
    }

    fn upgrade(&self, rt: &Runtime, req: &UpgradeRequest) -> Vec<Phase> {
        self.phases(Sequence::Upgrade, rt, &SequenceData::Upgrade(req.clone()))
    }

    fn reset(&self, rt: &Runtime, req: &ResetRequest) -> Vec<Phase> {
        self.phases(Sequence::Reset, rt, &SequenceData::Reset(req.clone()))
    }
}

impl fmt::Debug for SequenceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut planned: Vec<_> = self.plans.keys().map(Sequence::as_str).collect();
        planned.sort_unstable();
        f.debug_struct("SequenceTable")
            .field("sequences", &planned)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::runtime::{Mode, Platform, State};
    use crate::{TaskError, TaskFn, TaskLogger, TaskRef};

    fn noop(name: &'static str) -> TaskRef {
        TaskFn::arc(name, |_c: CancellationToken, _l: TaskLogger, _r: Runtime| async {
            Ok::<_, TaskError>(())
        })
    }

    fn shape(phases: &[Phase]) -> Vec<usize> {
        phases.iter().map(Phase::len).collect()
    }

    fn table() -> SequenceTable {
        SequenceTable::new()
            .on(Sequence::Boot, |rt, _| {
                let mut phases = vec![Phase::new().with_task(noop("mount"))];
                if !rt.mode().is_container() {
                    phases.push(Phase::new().with_task(noop("udevd")).with_task(noop("network")));
                }
                phases
            })
            .on(Sequence::Upgrade, |_, data| {
                let stage = data.as_upgrade().is_some_and(|req| req.stage);
                if stage {
                    vec![Phase::new().with_task(noop("stage"))]
                } else {
                    vec![
                        Phase::new().with_task(noop("install")),
                        Phase::new().with_task(noop("reboot")),
                    ]
                }
            })
            .with_phases(Sequence::Reset, vec![Phase::new().with_task(noop("wipe"))])
    }

    #[test]
    fn plan_derives_from_runtime() {
        let metal = Runtime::new(None, State::default());
        let container = Runtime::new(None, State::new(Platform::new("docker", Mode::Container)));

        let t = table();
        assert_eq!(shape(&plan(&t, Sequence::Boot, &metal, &SequenceData::None).unwrap()), [1, 2]);
        assert_eq!(shape(&plan(&t, Sequence::Boot, &container, &SequenceData::None).unwrap()), [1]);
    }

    #[test]
    fn payload_free_sequences_ignore_payload() {
        let rt = Runtime::new(None, State::default());
        let t = table();
        let with_payload = SequenceData::Upgrade(UpgradeRequest::new("img"));

        let a = plan(&t, Sequence::Boot, &rt, &SequenceData::None).unwrap();
        let b = plan(&t, Sequence::Boot, &rt, &with_payload).unwrap();
        assert_eq!(shape(&a), shape(&b));
    }

    #[test]
    fn payload_reaches_the_planner() {
        let rt = Runtime::new(None, State::default());
        let t = table();
        let staged = UpgradeRequest {
            stage: true,
            ..UpgradeRequest::new("img")
        };

        assert_eq!(shape(&plan(&t, Sequence::Upgrade, &rt, &staged.into()).unwrap()), [1]);
        assert_eq!(
            shape(&plan(&t, Sequence::Upgrade, &rt, &UpgradeRequest::new("img").into()).unwrap()),
            [1, 1]
        );
    }

    #[test]
    fn mismatched_payload_is_rejected() {
        let rt = Runtime::new(None, State::default());
        let t = table();

        let err = plan(&t, Sequence::Upgrade, &rt, &ResetRequest::default().into()).unwrap_err();
        assert!(matches!(
            err,
            ControllerError::InvalidSequenceData {
                sequence: Sequence::Upgrade,
                expected: "upgrade",
                got: "reset",
            }
        ));

        let err = plan(&t, Sequence::Reset, &rt, &SequenceData::None).unwrap_err();
        assert_eq!(err.as_label(), "invalid_sequence_data");
    }

    #[test]
    fn planning_twice_is_structurally_equal() {
        let rt = Runtime::new(None, State::default());
        let t = table();
        for seq in Sequence::ALL {
            let data = match seq {
                Sequence::Upgrade => UpgradeRequest::new("img").into(),
                Sequence::Reset => ResetRequest::default().into(),
                _ => SequenceData::None,
            };
            let a = plan(&t, seq, &rt, &data).unwrap();
            let b = plan(&t, seq, &rt, &data).unwrap();
            assert_eq!(shape(&a), shape(&b), "{seq}");
        }
    }

    #[test]
    fn unregistered_sequence_plans_nothing() {
        let rt = Runtime::new(None, State::default());
        let t = table();
        assert!(!t.contains(Sequence::Install));
        assert!(plan(&t, Sequence::Install, &rt, &SequenceData::None).unwrap().is_empty());
    }
}
