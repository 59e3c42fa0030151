//! # Example: Node lifecycle
//!
//! Boots a pretend node, then waits for SIGTERM (Ctrl-C on non-unix) and
//! runs the shutdown sequence.
//!
//! ```text
//! boot:      [mount-state] ──► [udevd, network, time-sync]
//! shutdown:  [stop-services] ──► [sync-disks, unmount]
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example lifecycle --features logging
//! kill -TERM <pid>
//! ```

use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use seqvisor::{
    Controller, ControllerConfig, LogWriter, Mode, Phase, Platform, Runtime, Sequence,
    SequenceData, SequenceTable, State, Subscribe, TaskError, TaskFn, TaskLogger, TaskRef,
};

/// Task that "works" for `work_ms` and logs through its scoped logger.
fn step(name: &'static str, work_ms: u64) -> TaskRef {
    TaskFn::arc(
        name,
        move |_ctx: CancellationToken, log: TaskLogger, rt: Runtime| async move {
            let platform = rt.state().platform().name();
            log.info(format_args!("{name} on {platform} ({})", rt.mode().as_str()));
            tokio::time::sleep(Duration::from_millis(work_ms)).await;
            Ok::<(), TaskError>(())
        },
    )
}

fn table() -> SequenceTable {
    SequenceTable::new()
        .on(Sequence::Boot, |rt, _| {
            let mut services = Phase::new().with_task(step("udevd", 150));
            if !rt.mode().is_container() {
                services = services
                    .with_task(step("network", 300))
                    .with_task(step("time-sync", 200));
            }
            vec![Phase::new().with_task(step("mount-state", 100)), services]
        })
        .with_phases(
            Sequence::Shutdown,
            vec![
                Phase::new().with_task(step("stop-services", 200)),
                Phase::new()
                    .with_task(step("sync-disks", 100))
                    .with_task(step("unmount", 150)),
            ],
        )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cfg = ControllerConfig {
        usb_delay_path: None,
        console: false,
        ..ControllerConfig::default()
    };
    let runtime = Runtime::new(None, State::new(Platform::new("demo", Mode::Metal)));
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];

    let ctl = Controller::builder(cfg)
        .with_runtime(runtime)
        .with_sequencer(table())
        .with_subscribers(subs)
        .build()
        .await?;

    ctl.run(Sequence::Boot, SequenceData::None).await?;
    println!("booted, pid {}; send SIGTERM to shut down", std::process::id());

    ctl.listen_for_events().await?;

    // Give the LogWriter worker a moment to drain.
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
