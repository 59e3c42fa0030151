//! # Shutdown trigger sources.
//!
//! The event listener races two sources:
//! - a [`SignalSource`] (the host termination signal), registered synchronously
//!   so that interest exists before the listener decides anything else;
//! - a [`PowerSource`] (power/button events, ACPI on real hardware), which
//!   blocks until an event arrives or fails.
//!
//! ## Defaults
//! **Unix platforms:** [`TermSignal`] listens for `SIGTERM`.
//!
//! **Other platforms:** [`TermSignal`] listens for Ctrl-C via `tokio::signal::windows::ctrl_c`.
//!
//! Both register eagerly, so a registration failure surfaces from
//! [`SignalSource::register`]. A signal stream that closes is not a delivery.
//!
//! [`NoPowerSource`] never produces an event; use it where no power event
//! device exists.

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::BoxError;

/// One-shot termination signal.
pub trait SignalSource: Send + Sync + 'static {
    /// Registers interest in the signal.
    ///
    /// The returned future completes once, when the signal is delivered.
    /// Each call creates an independent registration.
    fn register(&self) -> std::io::Result<BoxFuture<'static, ()>>;
}

/// Power/button event source.
#[async_trait]
pub trait PowerSource: Send + Sync + 'static {
    /// Blocks until a power event occurs (`Ok`) or the source fails (`Err`).
    async fn listen(&self) -> Result<(), BoxError>;
}

/// Host termination signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TermSignal;

impl SignalSource for TermSignal {
    #[cfg(unix)]
    fn register(&self) -> std::io::Result<BoxFuture<'static, ()>> {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate())?;
        Ok(Box::pin(until_delivered(async move { sigterm.recv().await })))
    }

    #[cfg(not(unix))]
    fn register(&self) -> std::io::Result<BoxFuture<'static, ()>> {
        let mut ctrl_c = tokio::signal::windows::ctrl_c()?;
        Ok(Box::pin(until_delivered(async move { ctrl_c.recv().await })))
    }
}

/// Completes when `recv` yields a delivery.
///
/// `None` means the signal driver is gone; that is not a delivery, so the
/// returned future stays pending instead of triggering a shutdown.
pub(crate) async fn until_delivered<F>(recv: F)
where
    F: std::future::Future<Output = Option<()>>,
{
    if recv.await.is_none() {
        std::future::pending::<()>().await;
    }
}

/// Power source that never fires.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPowerSource;

#[async_trait]
impl PowerSource for NoPowerSource {
    async fn listen(&self) -> Result<(), BoxError> {
        std::future::pending().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn no_power_source_stays_pending() {
        let res = tokio::time::timeout(Duration::from_secs(3600), NoPowerSource.listen()).await;
        assert!(res.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn closed_signal_stream_is_not_a_delivery() {
        let closed = until_delivered(async { None });
        let res = tokio::time::timeout(Duration::from_secs(3600), closed).await;
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn delivered_signal_completes() {
        let delivered = until_delivered(async { Some(()) });
        let res = tokio::time::timeout(Duration::from_secs(1), delivered).await;
        assert!(res.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn term_signal_registers() {
        assert!(TermSignal.register().is_ok());
    }
}
