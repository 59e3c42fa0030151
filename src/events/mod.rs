//! Runtime events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`], [`Progress`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Controller::run` (sequence/phase events), task units
//!   (task events), `Controller::listen_for_events` (listener events),
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the subscriber forwarder spawned by `ControllerBuilder::build`,
//!   and any receiver obtained from `Controller::subscribe`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind, Progress};
