//! # LogWriter: tracing-backed event printer
//!
//! A subscriber that renders incoming [`Event`]s as structured `tracing` records.
//! Install any `tracing` subscriber (e.g. `tracing_subscriber::fmt`) to see them.
//!
//! ## Example output
//! ```text
//! INFO seqvisor: sequence starting sequence=boot phases=3
//! INFO seqvisor: phase starting sequence=boot phase=1/3 tasks=2
//! INFO seqvisor: task starting sequence=boot phase=1/3 task=2/2
//! INFO seqvisor: task done sequence=boot phase=1/3 task=2/2 elapsed=12ms
//! WARN seqvisor: task failed sequence=boot phase=2/3 task=1/1 elapsed=3ms err="disk busy"
//! INFO seqvisor: shutdown requested source=signal
//! ```

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let sequence = e.sequence.map(|s| s.as_str()).unwrap_or("-");
        let phase = e.phase.map(|p| p.to_string()).unwrap_or_default();
        let task = e.task.map(|p| p.to_string()).unwrap_or_default();
        let elapsed = e.elapsed.unwrap_or_default();
        let reason = e.reason.as_deref().unwrap_or("");
        let subscriber = e.subscriber.unwrap_or("unknown");

        match e.kind {
            EventKind::SequenceStarting => {
                info!(sequence, phases = e.count, "sequence starting");
            }
            EventKind::SequenceCompleted => {
                info!(sequence, ?elapsed, "sequence done");
            }
            EventKind::SequenceFailed => {
                error!(sequence, %phase, ?elapsed, err = reason, "sequence failed");
            }
            EventKind::SequenceRejected => {
                warn!(sequence, "sequence rejected: another sequence is running");
            }
            EventKind::PhaseStarting => {
                info!(sequence, %phase, tasks = e.count, "phase starting");
            }
            EventKind::PhaseCompleted => {
                info!(sequence, %phase, ?elapsed, "phase done");
            }
            EventKind::PhaseFailed => {
                error!(sequence, %phase, ?elapsed, err = reason, "phase failed");
            }
            EventKind::TaskStarting => {
                debug!(sequence, %phase, %task, "task starting");
            }
            EventKind::TaskCompleted => {
                info!(sequence, %phase, %task, ?elapsed, "task done");
            }
            EventKind::TaskFailed => {
                warn!(sequence, %phase, %task, ?elapsed, err = reason, "task failed");
            }
            EventKind::ShutdownRequested => {
                info!(source = reason, "shutdown requested");
            }
            EventKind::ShutdownFailed => {
                error!(sequence, err = reason, "shutdown failed");
            }
            EventKind::ListenerFailed => {
                error!(err = reason, "event listener failed");
            }
            EventKind::SubscriberOverflow => {
                warn!(subscriber, reason, "subscriber dropped event");
            }
            EventKind::SubscriberPanicked => {
                error!(subscriber, info = reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
