//! # Event subscribers.
//!
//! [`Subscribe`] implementations receive every [`Event`](crate::Event) published
//! on the controller's bus through a [`SubscriberSet`], each with its own
//! bounded queue and worker.
//!
//! ```text
//! Bus ──► forwarder ──► SubscriberSet::emit(&Event)
//!                              ├──► LogWriter (feature "logging")
//!                              ├──► metrics / audit / API streams
//!                              └──► ...
//! ```

#[cfg(feature = "logging")]
mod log;
mod subscribe;
mod subscriber_set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;

pub(crate) use subscriber_set::panic_message;
