//! Handler for the `run` command.

use tokio::signal;
use tracing::{info, warn};

use crate::app::status_file::StatusWriter;
use crate::app::{Config, LogFormat, Monitor};
use crate::cli::{build_monitor, RunArgs};
use crate::error::Result;

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = Config::load(&args.config)?;

    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = LogFormat::Json;
    }
    if args.demo {
        config.monitor.demo_mode = true;
    }

    config.init_logging();
    info!(
        url = %config.rpc.url,
        timeout_secs = config.monitor.timeout_secs,
        demo = config.monitor.demo_mode,
        "ledgerwatch starting"
    );

    let monitor = build_monitor(&config);
    let handle = monitor.spawn();

    match config.status_file.clone() {
        Some(path) => {
            let writer = StatusWriter::new(path, config.rpc.url.clone());
            tokio::select! {
                () = write_status_loop(&monitor, &writer) => {}
                _ = signal::ctrl_c() => info!("Shutdown signal received"),
            }
        }
        None => {
            if let Err(e) = signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for shutdown signal");
            } else {
                info!("Shutdown signal received");
            }
        }
    }

    handle.shutdown().await;
    info!("ledgerwatch stopped");
    Ok(())
}

/// Write the snapshot at the monitor's poll cadence, forever.
async fn write_status_loop(monitor: &Monitor, writer: &StatusWriter) {
    loop {
        if let Err(e) = writer.write(&monitor.snapshot()) {
            warn!(path = %writer.path().display(), error = %e, "Failed to write status file");
        }
        tokio::time::sleep(monitor.config().poll_interval()).await;
    }
}
