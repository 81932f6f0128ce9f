//! Handler for the `check` command.

use std::path::Path;

use crate::app::Config;
use crate::cli::build_monitor;
use crate::error::Result;

/// Poll once, wait for the block and metric fetches, and print the
/// resulting snapshot as JSON.
pub async fn execute<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let config = Config::load(config_path)?;
    config.init_logging();

    let monitor = build_monitor(&config);
    let report = monitor.tick().await.settle().await;
    monitor.stop_subscription(Some("check complete"));

    println!("{}", serde_json::to_string_pretty(&monitor.snapshot())?);
    if !report.available {
        eprintln!("Client at {} is not reachable", config.rpc.url);
    }
    Ok(())
}
