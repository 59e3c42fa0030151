//! # seqvisor
//!
//! **seqvisor** drives a machine through its lifecycle sequences (boot,
//! initialize, install, shutdown, reboot, upgrade, reset). A sequence is an
//! ordered list of phases; a phase is a set of tasks that run concurrently.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   caller (CLI/API)            event listener (SIGTERM / power button)
//!          │                                   │
//!          │ run(seq, data)                    │ run(Shutdown, None)
//!          ▼                                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Controller                                                       │
//! │  - SequenceLock (single flight, fails fast with Locked)           │
//! │  - Sequencer    (pure planner: seq + runtime + data → phases)     │
//! │  - Runtime      (machine state + optional config, shared)         │
//! │  - Bus          (broadcast progress events)                       │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        ▼
//!   phase 1 ──► phase 2 ──► ... ──► phase N          (strictly serial)
//!     │
//!     ├─► task 1 ┐
//!     ├─► task 2 ├─ concurrent, join all, first failure in completion order
//!     └─► task M ┘
//! ```
//!
//! ### Errors
//! ```text
//! task error "disk busy"
//!   └─► PhaseError        "task 1/1: failed, disk busy"
//!         └─► ControllerError::Phase
//!               "error running phase 2/2 in shutdown sequence: task 1/1: failed, disk busy"
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                          |
//! |-------------------|----------------------------------------------------------|---------------------------------------------|
//! | **Sequences**     | Named operations and their payloads.                     | [`Sequence`], [`SequenceData`]              |
//! | **Planning**      | Map a sequence request to phases.                        | [`Sequencer`], [`SequenceTable`], [`plan`]  |
//! | **Tasks**         | Units of work and their factories.                       | [`Task`], [`TaskFn`], [`Phase`]             |
//! | **Execution**     | Single-flight, phase-serial, task-parallel runs.         | [`Controller`], [`ControllerBuilder`]       |
//! | **Listener**      | Shutdown on termination signal or power event.           | [`SignalSource`], [`PowerSource`]           |
//! | **Observability** | Progress events and task-scoped loggers.                 | [`Subscribe`], [`Event`], [`LogSink`]       |
//! | **Errors**        | Typed errors with stable labels.                         | [`ControllerError`], [`TaskError`]          |
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], a subscriber rendering events through `tracing`.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use seqvisor::{
//!     Controller, ControllerConfig, Phase, Runtime, Sequence, SequenceData, SequenceTable,
//!     State, TaskError, TaskFn, TaskLogger,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sync = TaskFn::arc("sync-disks", |_ctx: CancellationToken, log: TaskLogger, _rt: Runtime| async move {
//!         log.info("disks synced");
//!         Ok::<_, TaskError>(())
//!     });
//!
//!     let table = SequenceTable::new()
//!         .with_phases(Sequence::Shutdown, vec![Phase::new().with_task(sync)]);
//!
//!     let cfg = ControllerConfig { usb_delay_path: None, console: false, ..Default::default() };
//!     let ctl = Controller::builder(cfg)
//!         .with_runtime(Runtime::new(None, State::default()))
//!         .with_sequencer(table)
//!         .build()
//!         .await?;
//!
//!     ctl.run(Sequence::Shutdown, SequenceData::None).await?;
//!     Ok(())
//! }
//! ```
mod controller;
mod error;
mod events;
mod logger;
mod runtime;
mod sequence;
mod sequencer;
mod signals;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use controller::{
    Controller, ControllerBuilder, ControllerConfig, LockGuard, SequenceLock, USB_DELAY_PATH,
};
pub use error::{
    BoxError, BuildError, ControllerError, ListenerError, LoggerError, PhaseError, TaskError,
};
pub use events::{Bus, Event, EventKind, Progress};
pub use logger::{LogSink, TaskLogger, TracingSink};
pub use runtime::{ConfigParser, Configurator, Mode, Platform, Runtime, State};
pub use sequence::{ResetRequest, Sequence, SequenceData, UpgradeRequest};
pub use sequencer::{SequenceTable, Sequencer, plan};
pub use signals::{NoPowerSource, PowerSource, SignalSource, TermSignal};
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{BoxTaskFuture, Phase, Task, TaskFn, TaskRef, TaskSetupFn};

// Optional: expose a tracing-backed logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
