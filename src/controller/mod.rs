//! # Controller: single-flight sequence execution.
//!
//! The [`Controller`] resolves a [`Sequence`](crate::Sequence) into phases via
//! its [`Sequencer`](crate::Sequencer), runs phases serially and the tasks of
//! each phase concurrently, and reduces failures to one positional error.
//!
//! ## Architecture
//! ```text
//! Controller::run(seq, data)
//!   ├─► runtime attached?          no  → UndefinedRuntime
//!   ├─► SequenceLock::acquire()    held → Locked   (never waits)
//!   ├─► sequencer::plan()          payload mismatch → InvalidSequenceData
//!   └─► for phase in phases (serial):
//!          run_phase()
//!            ├─► tokio::spawn(unit) per task factory
//!            │      TaskHarness::run_task(): logger → factory → task.spawn()
//!            └─► join all, keep first failure in completion order
//!          failure → Phase { phase n/N, sequence, task t/T, cause }; stop
//!
//! Controller::listen_for_events()
//!   signal ─┐
//!           ├─► first wins ─► Run(Shutdown) (error logged, not returned)
//!   power  ─┘               or power source error returned
//! ```
//!
//! Internal modules:
//! - [`builder`]: construction, USB delay probe, bus/subscriber wiring;
//! - `core`: the controller and its run loop;
//! - `harness`: one task invocation;
//! - `phase`: concurrent phase execution;
//! - `lock`: non-blocking single-flight lock;
//! - `listener`: signal/power event listener;
//! - `usb`: USB storage delay probe.

pub mod builder;
pub mod config;
pub mod lock;

mod core;
mod harness;
mod listener;
mod phase;
mod usb;


pub use builder::ControllerBuilder;
pub use config::{ControllerConfig, USB_DELAY_PATH};
pub use self::core::Controller;
pub use lock::{LockGuard, SequenceLock};
