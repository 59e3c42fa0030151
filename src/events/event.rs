//! # Runtime events emitted by the controller and the event listener.
//!
//! The [`EventKind`] enum classifies events into:
//! - **Sequence events**: a sequence run starting, finishing, failing or being rejected
//! - **Phase events**: one phase of a run starting, finishing or failing
//! - **Task events**: one task unit starting, finishing or failing
//! - **Listener events**: shutdown triggers and event source failures
//! - **Subscriber events**: delivery problems inside the [`SubscriberSet`](crate::SubscriberSet)
//!
//! The [`Event`] struct carries optional metadata (sequence, phase/task
//! position, child count, elapsed time, reason) depending on the kind.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use seqvisor::{Event, EventKind, Progress, Sequence};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_sequence(Sequence::Shutdown)
//!     .with_phase(Progress::new(2, 2))
//!     .with_task(Progress::new(1, 1))
//!     .with_elapsed(Duration::from_millis(40))
//!     .with_reason("disk busy");
//!
//! assert_eq!(ev.task.map(|p| p.to_string()).as_deref(), Some("1/1"));
//! assert_eq!(ev.reason.as_deref(), Some("disk busy"));
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::sequence::Sequence;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Sequence events ===
    /// A sequence acquired the lock and was planned.
    ///
    /// Sets: `sequence`, `count` (number of phases)
    SequenceStarting,

    /// Every phase of the sequence succeeded.
    ///
    /// Sets: `sequence`, `elapsed`
    SequenceCompleted,

    /// A phase failed and the sequence was aborted.
    ///
    /// Sets: `sequence`, `phase`, `elapsed`, `reason`
    SequenceFailed,

    /// The sequence was refused because another one is in flight.
    ///
    /// Sets: `sequence`
    SequenceRejected,

    // === Phase events ===
    /// A phase is launching its tasks.
    ///
    /// Sets: `sequence`, `phase`, `count` (number of tasks)
    PhaseStarting,

    /// Every task of the phase succeeded.
    ///
    /// Sets: `sequence`, `phase`, `elapsed`
    PhaseCompleted,

    /// At least one task of the phase failed.
    ///
    /// Sets: `sequence`, `phase`, `elapsed`, `reason` (the surfaced failure)
    PhaseFailed,

    // === Task events ===
    /// A task unit started.
    ///
    /// Sets: `sequence`, `phase`, `task`
    TaskStarting,

    /// A task unit finished successfully (including skipped tasks).
    ///
    /// Sets: `sequence`, `phase`, `task`, `elapsed`
    TaskCompleted,

    /// A task unit failed.
    ///
    /// Sets: `sequence`, `phase`, `task`, `elapsed`, `reason`
    TaskFailed,

    // === Listener events ===
    /// A shutdown trigger fired.
    ///
    /// Sets: `reason` (trigger source: `"signal"` or `"power"`)
    ShutdownRequested,

    /// The shutdown sequence triggered by the listener failed; the error is not propagated.
    ///
    /// Sets: `sequence`, `reason`
    ShutdownFailed,

    /// An event source failed.
    ///
    /// Sets: `reason`
    ListenerFailed,

    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets: `subscriber`, `reason`
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `subscriber`, `reason`
    SubscriberOverflow,
}

/// 1-based position within a group of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub number: u32,
    pub total: u32,
}

impl Progress {
    pub fn new(number: usize, total: usize) -> Self {
        Self {
            number: clamp_u32(number),
            total: clamp_u32(total),
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.number, self.total)
    }
}

/// Runtime event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Sequence the event belongs to.
    pub sequence: Option<Sequence>,
    /// Phase position within the sequence.
    pub phase: Option<Progress>,
    /// Task position within the phase.
    pub task: Option<Progress>,
    /// Number of children (phases of a sequence, tasks of a phase).
    pub count: Option<u32>,
    /// Time spent in the sequence/phase/task.
    pub elapsed: Option<Duration>,
    /// Human-readable reason (errors, trigger source, overflow details).
    pub reason: Option<Arc<str>>,
    /// Subscriber name, for subscriber events.
    pub subscriber: Option<&'static str>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            sequence: None,
            phase: None,
            task: None,
            count: None,
            elapsed: None,
            reason: None,
            subscriber: None,
        }
    }

    #[inline]
    pub fn with_sequence(mut self, sequence: Sequence) -> Self {
        self.sequence = Some(sequence);
        self
    }

    #[inline]
    pub fn with_phase(mut self, phase: Progress) -> Self {
        self.phase = Some(phase);
        self
    }

    #[inline]
    pub fn with_task(mut self, task: Progress) -> Self {
        self.task = Some(task);
        self
    }

    #[inline]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(clamp_u32(count));
        self
    }

    #[inline]
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = Some(elapsed);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        let mut ev = Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"));
        ev.subscriber = Some(subscriber);
        ev
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        let mut ev = Event::new(EventKind::SubscriberPanicked).with_reason(info);
        ev.subscriber = Some(subscriber);
        ev
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }
}

fn clamp_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_monotonic() {
        let a = Event::new(EventKind::PhaseStarting);
        let b = Event::new(EventKind::PhaseCompleted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn overflow_event_names_subscriber() {
        let ev = Event::subscriber_overflow("audit", "full");
        assert!(ev.is_subscriber_overflow());
        assert_eq!(ev.subscriber, Some("audit"));
        assert_eq!(ev.reason.as_deref(), Some("subscriber=audit reason=full"));
    }

    #[test]
    fn progress_renders_as_fraction() {
        assert_eq!(Progress::new(3, 5).to_string(), "3/5");
    }
}
