//! # Event listener: shutdown on termination signal or power event.
//!
//! ```text
//! listen_for_events()
//!   ├─► register termination signal ──► spawn: wait ─► Run(Shutdown) ─► tx.send(Ok)
//!   ├─► platform mode == container ──► return Ok(())   (signal waiter keeps running)
//!   ├─► spawn: power.listen()
//!   │          ├─ Err(e) ─► tx.send(Err(e))
//!   │          └─ Ok     ─► Run(Shutdown) ─► tx.send(Ok)
//!   └─► rx.recv()  first message wins, the other source is left running
//! ```
//!
//! ## Rules
//! - The shutdown run's own error is published (`ShutdownFailed`) and dropped;
//!   it never becomes the listener's result.
//! - Only the power source's **own** failure is returned.
//! - Nothing is cancelled when the listener returns.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    error::{ControllerError, ListenerError},
    events::{Event, EventKind},
    sequence::{Sequence, SequenceData},
};

use super::Controller;

impl Controller {
    /// Blocks until the termination signal or a power event triggers a shutdown
    /// run, or until the power source fails.
    ///
    /// In container mode, returns `Ok(())` right after registering for the
    /// termination signal; the signal waiter stays active in the background.
    pub async fn listen_for_events(self: &Arc<Self>) -> Result<(), ControllerError> {
        let Some(runtime) = self.runtime.as_ref() else {
            return Err(ControllerError::UndefinedRuntime);
        };

        let signal = self.signal.register().map_err(ListenerError::Signal)?;
        let (tx, mut rx) = mpsc::channel::<Result<(), ListenerError>>(2);

        {
            let ctl = Arc::clone(self);
            let tx = tx.clone();
            tokio::spawn(async move {
                signal.await;
                ctl.shutdown_from("signal").await;
                let _ = tx.send(Ok(())).await;
            });
        }

        if runtime.mode().is_container() {
            return Ok(());
        }

        {
            let ctl = Arc::clone(self);
            let power = Arc::clone(&self.power);
            tokio::spawn(async move {
                if let Err(e) = power.listen().await {
                    let err = ListenerError::Power(e.to_string());
                    ctl.publish(Event::new(EventKind::ListenerFailed).with_reason(err.to_string()));
                    let _ = tx.send(Err(err)).await;
                    return;
                }
                ctl.shutdown_from("power").await;
                let _ = tx.send(Ok(())).await;
            });
        }

        match rx.recv().await {
            Some(res) => res.map_err(ControllerError::from),
            None => Ok(()),
        }
    }

    /// Runs the shutdown sequence, reporting but not returning its error.
    async fn shutdown_from(&self, source: &'static str) {
        self.publish(Event::new(EventKind::ShutdownRequested).with_reason(source));

        if let Err(e) = self.run(Sequence::Shutdown, SequenceData::None).await {
            tracing::warn!(source, error = %e, "shutdown failed");
            self.publish(
                Event::new(EventKind::ShutdownFailed)
                    .with_sequence(Sequence::Shutdown)
                    .with_reason(e.to_string()),
            );
        }
    }
}
