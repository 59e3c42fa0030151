use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{
    error::BuildError,
    events::Bus,
    logger::{LogSink, TracingSink},
    runtime::Runtime,
    sequencer::{SequenceTable, Sequencer},
    signals::{NoPowerSource, PowerSource, SignalSource, TermSignal},
    subscribers::{Subscribe, SubscriberSet},
};

use super::{config::ControllerConfig, core::Controller, lock::SequenceLock, usb};

/// Builder for constructing a [`Controller`].
///
/// Defaults:
/// - no runtime (every `run` fails with `UndefinedRuntime` until one is attached)
/// - an empty [`SequenceTable`] (every sequence plans zero phases)
/// - [`TracingSink`] task loggers
/// - [`TermSignal`] and [`NoPowerSource`] for the event listener
pub struct ControllerBuilder {
    cfg: ControllerConfig,
    runtime: Option<Runtime>,
    sequencer: Arc<dyn Sequencer>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    sink: Arc<dyn LogSink>,
    signal: Arc<dyn SignalSource>,
    power: Arc<dyn PowerSource>,
}

impl ControllerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: ControllerConfig) -> Self {
        Self {
            cfg,
            runtime: None,
            sequencer: Arc::new(SequenceTable::new()),
            subscribers: Vec::new(),
            sink: Arc::new(TracingSink),
            signal: Arc::new(TermSignal),
            power: Arc::new(NoPowerSource),
        }
    }

    /// Attaches the runtime shared by every task.
    pub fn with_runtime(mut self, runtime: Runtime) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn with_sequencer(mut self, sequencer: impl Sequencer) -> Self {
        self.sequencer = Arc::new(sequencer);
        self
    }

    /// Sets event subscribers (each gets its own bounded queue and worker).
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    pub fn with_log_sink(mut self, sink: impl LogSink) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn with_signal_source(mut self, signal: impl SignalSource) -> Self {
        self.signal = Arc::new(signal);
        self
    }

    pub fn with_power_source(mut self, power: impl PowerSource) -> Self {
        self.power = Arc::new(power);
        self
    }

    /// Builds the controller.
    ///
    /// Waits for the USB storage delay first (see
    /// [`ControllerConfig::usb_delay_path`]), then wires the event bus and
    /// subscriber workers. Must be called from within a tokio runtime.
    pub async fn build(self) -> Result<Arc<Controller>, BuildError> {
        if let Some(path) = self.cfg.usb_delay_path.as_deref() {
            usb::wait_for_usb_delay(path).await?;
        }

        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(self.subscribers, bus.clone()));
        let stop = CancellationToken::new();
        if !subs.is_empty() {
            subscriber_listener(&bus, &subs, stop.clone());
        }

        Ok(Arc::new(Controller {
            cfg: Arc::new(self.cfg),
            runtime: self.runtime,
            sequencer: self.sequencer,
            lock: SequenceLock::new(),
            bus,
            subs,
            sink: self.sink,
            signal: self.signal,
            power: self.power,
            _forwarder: stop.drop_guard(),
        }))
    }
}

/// Forwards bus events to the subscriber set until `stop` fires.
///
/// The controller cancels `stop` when dropped. The forwarder then releases the
/// set, which closes the subscriber queues and lets their workers exit.
fn subscriber_listener(bus: &Bus, subs: &Arc<SubscriberSet>, stop: CancellationToken) {
    use tokio::sync::broadcast::error::RecvError;

    let mut rx = bus.subscribe();
    let set = Arc::clone(subs);
    tokio::spawn(async move {
        loop {
            let recv = tokio::select! {
                _ = stop.cancelled() => break,
                recv = rx.recv() => recv,
            };
            match recv {
                Ok(ev) => set.emit(&ev),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "subscriber forwarder lagged behind the bus");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
