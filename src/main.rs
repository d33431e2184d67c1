//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `node_atlas` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Printing location bins as JSON
//!
//! All core functionality is implemented in the library crate.

use std::future::Future;
use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use node_atlas::initialization::init_logger_with;
use node_atlas::{Config, LocationBin, NodePipeline, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // GEOIP_CITY_DB may be set there instead of passing --geoip
    if dotenvy::dotenv().is_err() {
        // If .env not found in current dir, try next to the executable
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::from(Opt::parse());

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    let pipeline = NodePipeline::from_config(&config).context("Failed to initialize HTTP client")?;

    match config.watch {
        None => match pipeline.get_nodes().await.into_result() {
            Ok(bins) => print_bins(&bins, config.pretty),
            Err(e) => {
                eprintln!("node_atlas error: {}", e);
                process::exit(1);
            }
        },
        Some(secs) => {
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    log::error!("Failed to listen for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
            };
            watch(&pipeline, Duration::from_secs(secs), config.pretty, shutdown).await
        }
    }
}

/// Re-runs the pipeline every `period` until `shutdown` resolves. Failed runs
/// are logged and retried on the next tick.
///
/// The same `shutdown` future is polled for the whole loop, including while a
/// run is in progress, so a signal is never missed between ticks.
async fn watch<F>(pipeline: &NodePipeline, period: Duration, pretty: bool, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    log::info!("Refreshing every {}s, press Ctrl-C to stop", period.as_secs());

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }
        tokio::select! {
            _ = &mut shutdown => break,
            outcome = pipeline.get_nodes() => match outcome.into_result() {
                Ok(bins) => print_bins(&bins, pretty)?,
                Err(e) => log::error!("Run failed: {}", e),
            },
        }
    }

    log::info!("Interrupted, shutting down");
    Ok(())
}

fn print_bins(bins: &[LocationBin], pretty: bool) -> Result<()> {
    if bins.is_empty() {
        log::warn!("No node data");
    }
    let json = if pretty {
        serde_json::to_string_pretty(bins)
    } else {
        serde_json::to_string(bins)
    }
    .context("Failed to serialize location bins")?;
    println!("{}", json);
    Ok(())
}
