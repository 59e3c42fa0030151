use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;
use tokio_util::sync::DropGuard;

use crate::{
    error::ControllerError,
    events::{Bus, Event, EventKind, Progress},
    logger::LogSink,
    runtime::Runtime,
    sequence::{Sequence, SequenceData},
    sequencer::{Sequencer, plan},
    signals::{PowerSource, SignalSource},
    subscribers::SubscriberSet,
    tasks::Phase,
};

use super::{
    builder::ControllerBuilder,
    config::ControllerConfig,
    harness::TaskHarness,
    lock::SequenceLock,
    phase::run_phase,
};

/// Drives the machine through sequences.
///
/// At most one sequence runs at a time per controller; a second caller gets
/// [`ControllerError::Locked`] immediately instead of waiting.
pub struct Controller {
    pub(super) cfg: Arc<ControllerConfig>,
    pub(super) runtime: Option<Runtime>,
    pub(super) sequencer: Arc<dyn Sequencer>,
    pub(super) lock: SequenceLock,
    pub(super) bus: Bus,
    pub(super) subs: Arc<SubscriberSet>,
    pub(super) sink: Arc<dyn LogSink>,
    pub(super) signal: Arc<dyn SignalSource>,
    pub(super) power: Arc<dyn PowerSource>,
    /// Stops the subscriber forwarder when the controller goes away.
    pub(super) _forwarder: DropGuard,
}

impl Controller {
    /// Creates a builder with the given configuration.
    pub fn builder(cfg: ControllerConfig) -> ControllerBuilder {
        ControllerBuilder::new(cfg)
    }

    /// Executes every phase of `sequence` in order, aborting on the first
    /// phase failure.
    ///
    /// ### Flow
    /// 1. No runtime attached → [`ControllerError::UndefinedRuntime`] (lock untouched)
    /// 2. Lock held elsewhere → [`ControllerError::Locked`] (never waits)
    /// 3. Plan phases; a payload mismatch returns the planning error as is
    /// 4. Run phases serially; a failure returns [`ControllerError::Phase`]
    ///
    /// The lock is released on every return path.
    pub async fn run(&self, sequence: Sequence, data: SequenceData) -> Result<(), ControllerError> {
        let Some(runtime) = self.runtime.as_ref() else {
            return Err(ControllerError::UndefinedRuntime);
        };

        let Some(_guard) = self.lock.acquire() else {
            self.publish(Event::new(EventKind::SequenceRejected).with_sequence(sequence));
            return Err(ControllerError::Locked);
        };

        let phases = plan(self.sequencer.as_ref(), sequence, runtime, &data)?;

        self.execute(sequence, &phases, Arc::new(data), runtime).await
    }

    /// Attempts to take the single-flight lock.
    ///
    /// Returns `true` if it was **already held**, `false` if the caller now holds it.
    pub fn try_lock(&self) -> bool {
        self.lock.try_lock()
    }

    /// Releases the single-flight lock. Returns whether it was held.
    pub fn unlock(&self) -> bool {
        self.lock.unlock()
    }

    /// The attached runtime, if any.
    pub fn runtime(&self) -> Option<&Runtime> {
        self.runtime.as_ref()
    }

    pub fn sequencer(&self) -> &Arc<dyn Sequencer> {
        &self.sequencer
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.cfg
    }

    /// Receiver for every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Number of subscribers attached at build time.
    pub fn subscriber_count(&self) -> usize {
        self.subs.len()
    }

    pub(super) fn publish(&self, ev: Event) {
        self.bus.publish(ev);
    }

    async fn execute(
        &self,
        sequence: Sequence,
        phases: &[Phase],
        data: Arc<SequenceData>,
        runtime: &Runtime,
    ) -> Result<(), ControllerError> {
        let started = Instant::now();
        let total = phases.len();

        tracing::debug!(%sequence, phases = total, "sequence starting");
        self.publish(
            Event::new(EventKind::SequenceStarting)
                .with_sequence(sequence)
                .with_count(total),
        );

        let harness = TaskHarness {
            cfg: Arc::clone(&self.cfg),
            runtime: runtime.clone(),
            sink: Arc::clone(&self.sink),
            bus: self.bus.clone(),
        };

        for (idx, phase) in phases.iter().enumerate() {
            let number = idx + 1;
            let position = Progress::new(number, total);
            let phase_started = Instant::now();

            tracing::debug!(%sequence, phase = %position, tasks = phase.len(), "phase starting");
            self.publish(
                Event::new(EventKind::PhaseStarting)
                    .with_sequence(sequence)
                    .with_phase(position)
                    .with_count(phase.len()),
            );

            if let Err(source) = run_phase(&harness, phase, position, sequence, &data).await {
                let reason = source.to_string();
                tracing::debug!(
                    %sequence,
                    phase = %position,
                    elapsed = ?phase_started.elapsed(),
                    error = %reason,
                    "phase failed"
                );
                self.publish(
                    Event::new(EventKind::PhaseFailed)
                        .with_sequence(sequence)
                        .with_phase(position)
                        .with_elapsed(phase_started.elapsed())
                        .with_reason(reason.as_str()),
                );
                self.publish(
                    Event::new(EventKind::SequenceFailed)
                        .with_sequence(sequence)
                        .with_phase(position)
                        .with_elapsed(started.elapsed())
                        .with_reason(reason),
                );

                return Err(ControllerError::Phase {
                    sequence,
                    phase: number,
                    phases: total,
                    source,
                });
            }

            tracing::debug!(
                %sequence,
                phase = %position,
                elapsed = ?phase_started.elapsed(),
                "phase done"
            );
            self.publish(
                Event::new(EventKind::PhaseCompleted)
                    .with_sequence(sequence)
                    .with_phase(position)
                    .with_elapsed(phase_started.elapsed()),
            );
        }

        tracing::debug!(%sequence, elapsed = ?started.elapsed(), "sequence done");
        self.publish(
            Event::new(EventKind::SequenceCompleted)
                .with_sequence(sequence)
                .with_elapsed(started.elapsed()),
        );

        Ok(())
    }
}
