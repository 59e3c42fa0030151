//! # Phase execution: unbounded fan-out, join-all, first failure wins.
//!
//! ```text
//! run_phase(phase)
//!   ├─► tokio::spawn(unit 1) ─┐
//!   ├─► tokio::spawn(unit 2) ─┼─► FuturesUnordered (completion order)
//!   └─► tokio::spawn(unit N) ─┘          │
//!                                        ▼
//!                     keep first Err, drain the rest, return
//! ```
//!
//! ## Rules
//! - Every unit runs to completion; a failing sibling cancels nothing.
//! - The phase waits for **all** units before returning.
//! - Only the first failure in completion order surfaces; later ones are
//!   published as events and otherwise discarded.
//! - A panicking unit is a failure of that task ([`TaskError::Panicked`]).

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{FuturesUnordered, StreamExt};

use crate::{
    controller::harness::TaskHarness,
    error::{PhaseError, TaskError},
    events::{Event, EventKind, Progress},
    sequence::{Sequence, SequenceData},
    subscribers::panic_message,
    tasks::Phase,
};

/// Runs every task of `phase` concurrently and reduces failures to one.
pub(crate) async fn run_phase(
    harness: &TaskHarness,
    phase: &Phase,
    position: Progress,
    sequence: Sequence,
    data: &Arc<SequenceData>,
) -> Result<(), PhaseError> {
    let tasks = phase.len();

    let mut units: FuturesUnordered<_> = phase
        .iter()
        .enumerate()
        .map(|(idx, setup)| {
            let number = idx + 1;
            let harness = harness.clone();
            let setup = Arc::clone(setup);
            let data = Arc::clone(data);

            let handle = tokio::spawn(async move {
                let started = Instant::now();
                let progress = Progress::new(number, tasks);
                harness.bus.publish(
                    Event::new(EventKind::TaskStarting)
                        .with_sequence(sequence)
                        .with_phase(position)
                        .with_task(progress),
                );

                let res = harness.run_task(number, &setup, sequence, &data).await;
                publish_outcome(&harness, sequence, position, progress, started, &res);
                res
            });

            async move { (number, handle.await) }
        })
        .collect();

    let mut first: Option<PhaseError> = None;
    while let Some((number, joined)) = units.next().await {
        let res = joined.unwrap_or_else(|join_err| {
            let error = if join_err.is_panic() {
                panic_message(&*join_err.into_panic())
            } else {
                join_err.to_string()
            };
            let err = TaskError::Panicked { error };
            harness.bus.publish(
                Event::new(EventKind::TaskFailed)
                    .with_sequence(sequence)
                    .with_phase(position)
                    .with_task(Progress::new(number, tasks))
                    .with_reason(err.to_string()),
            );
            Err(err)
        });

        if let Err(source) = res {
            if first.is_none() {
                first = Some(PhaseError {
                    task: number,
                    tasks,
                    source,
                });
            }
        }
    }

    match first {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn publish_outcome(
    harness: &TaskHarness,
    sequence: Sequence,
    phase: Progress,
    task: Progress,
    started: Instant,
    res: &Result<(), TaskError>,
) {
    let ev = match res {
        Ok(()) => Event::new(EventKind::TaskCompleted),
        Err(e) => Event::new(EventKind::TaskFailed).with_reason(e.to_string()),
    };
    harness.bus.publish(
        ev.with_sequence(sequence)
            .with_phase(phase)
            .with_task(task)
            .with_elapsed(started.elapsed()),
    );
}
