//! Endpoint health monitor daemon.
//!
//! # Architecture Overview
//!
//! ```text
//!   config.toml ──▶ config::load_config ──▶ MonitorFleet::reconcile
//!        │                                        │
//!        └── ConfigWatcher (--watch) ─────────────┤
//!                                                 ▼
//!                              ┌───────────── one task per endpoint ─────────────┐
//!                              │  Monitor: delay → probe → adapt → publish → sleep │
//!                              └──────────────────────┬──────────────────────────┘
//!                                                     ▼
//!                                   HealthStatus stream (fan-in)
//!                                                     │
//!                                     logs + metrics ◀┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use health_monitor::config::{load_config, ConfigWatcher, MonitorConfig};
use health_monitor::health::{HealthStatus, MonitorFleet};
use health_monitor::lifecycle::{wait_for_signal, Shutdown};
use health_monitor::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "health-monitor")]
#[command(about = "Continuously probe endpoints and report health transitions", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload the configuration when the file changes
    #[arg(short, long, requires = "config")]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => MonitorConfig::default(),
    };

    logging::init_logging(&config.observability)?;
    tracing::info!("health-monitor v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = wait_for_signal().await {
                tracing::error!(error = %e, "Failed to listen for signals");
            }
            shutdown.trigger();
        });
    }

    // Kept alive for the lifetime of the daemon.
    let (_watcher, mut config_updates) = match (&cli.config, cli.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), Some(updates))
        }
        _ => (None, None),
    };

    let (mut fleet, mut statuses) = MonitorFleet::new(config.endpoints.len().max(16));
    let summary = fleet.reconcile(&config);
    tracing::info!(
        endpoints = fleet.len(),
        failed = summary.failed,
        "Monitoring started"
    );
    if fleet.is_empty() {
        tracing::warn!("No endpoints configured");
    }

    loop {
        tokio::select! {
            Some(status) = statuses.recv() => report(&status),
            Some(update) = recv_update(&mut config_updates) => {
                let summary = fleet.reconcile(&update);
                tracing::info!(
                    started = summary.started,
                    stopped = summary.stopped,
                    unchanged = summary.unchanged,
                    failed = summary.failed,
                    "Configuration reloaded"
                );
            }
            _ = shutdown.wait() => break,
        }
    }

    fleet.stop_all().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn recv_update(
    updates: &mut Option<tokio::sync::mpsc::UnboundedReceiver<MonitorConfig>>,
) -> Option<MonitorConfig> {
    match updates {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

fn report(status: &HealthStatus) {
    if !status.did_change {
        tracing::debug!(address = %status.address, healthy = status.healthy, message = %status.message, "Check completed");
        return;
    }

    metrics::record_transition(status.address, status.healthy);
    if status.healthy {
        tracing::info!(address = %status.address, message = %status.message, "Endpoint is UP");
    } else {
        tracing::warn!(address = %status.address, message = %status.message, "Endpoint is DOWN");
    }
}
