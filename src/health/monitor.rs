//! Per-endpoint polling loop.
//!
//! # Responsibilities
//! - Run one independent task per endpoint until it is told to stop
//! - Publish one observation per completed check, in check order
//! - Sleep for the endpoint's current retention between checks
//!
//! # Lifecycle
//! ```text
//! Monitor::new ──start()──▶ Running ──StopHandle::stop()──▶ Stopped
//!                             │
//!                             ├─ random startup delay [0, 1s)
//!                             └─ loop: stop? → wait for consumer → check → publish → sleep(retention)
//! ```
//!
//! # Design Decisions
//! - The stop signal is only acted upon at the top of an iteration; a check
//!   that is already running always completes and is published
//! - Sleeps wake early on stop so a stopped monitor exits promptly
//! - A check only starts once the previous observation has been taken;
//!   nothing is dropped or queued, a slow consumer just slows the loop down
//! - A dropped subscriber ends the loop

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use rand::RngCore;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time;

use crate::health::state::EndpointHealth;
use crate::health::status::HealthStatus;
use crate::observability::metrics;
use crate::probe::Probe;

/// A monitor that has not been started yet.
#[derive(Debug)]
pub struct Monitor {
    health: EndpointHealth,
}

impl Monitor {
    pub fn new(
        address: SocketAddr,
        probe: Arc<dyn Probe>,
        planned_retention: Duration,
        max_retention: Duration,
        max_response_time: Duration,
    ) -> Self {
        Self {
            health: EndpointHealth::new(address, probe, planned_retention, max_retention, max_response_time),
        }
    }

    /// Replace the random source used for jitter and the startup delay.
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.health = self.health.with_rng(rng);
        self
    }

    pub fn address(&self) -> SocketAddr {
        self.health.address()
    }

    pub fn health(&self) -> &EndpointHealth {
        &self.health
    }

    /// Spawn the polling loop on the current Tokio runtime.
    ///
    /// Returns the handle used to stop the loop and the stream of
    /// observations. The stream ends once the loop has stopped.
    pub fn start(self) -> (MonitorHandle, mpsc::Receiver<HealthStatus>) {
        let address = self.health.address();
        let (status_tx, status_rx) = mpsc::channel(1);
        let (stop_tx, stop_rx) = watch::channel(false);

        let task = tokio::spawn(run(self.health, status_tx, stop_rx));

        let handle = MonitorHandle {
            address,
            stop: StopHandle {
                tx: Arc::new(stop_tx),
            },
            task,
        };
        (handle, status_rx)
    }
}

/// One-shot stop signal for a running monitor. Cheap to clone.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    /// Ask the monitor to stop. Calling this more than once is harmless.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

/// Owner-side handle of a running monitor.
#[derive(Debug)]
pub struct MonitorHandle {
    address: SocketAddr,
    stop: StopHandle,
    task: JoinHandle<EndpointHealth>,
}

impl MonitorHandle {
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the loop to terminate and hand back the final endpoint state.
    ///
    /// This does not stop the loop by itself; call [`MonitorHandle::stop`]
    /// first or drop the observation stream.
    pub async fn join(self) -> Result<EndpointHealth, JoinError> {
        self.task.await
    }
}

async fn run(
    mut health: EndpointHealth,
    status_tx: mpsc::Sender<HealthStatus>,
    mut stop: watch::Receiver<bool>,
) -> EndpointHealth {
    let address = health.address();

    // Spread out monitors that are started at the same moment.
    let startup_delay = health.startup_delay();
    pause(startup_delay, &mut stop).await;

    tracing::debug!(address = %address, probe = health.probe().name(), "Starting monitoring");

    loop {
        if *stop.borrow() {
            tracing::debug!(address = %address, "Stopped monitoring");
            break;
        }

        // Wait until the previous observation has been taken before probing.
        let permit = tokio::select! {
            permit = status_tx.reserve() => match permit {
                Ok(permit) => permit,
                Err(_) => {
                    tracing::debug!(address = %address, "Observation receiver dropped, stopping monitor");
                    break;
                }
            },
            Ok(()) = stop.changed() => continue,
        };

        let status = health.observe().await;
        metrics::record_check(address, status.healthy, health.retention());
        permit.send(status);

        pause(health.retention(), &mut stop).await;
    }

    health
}

/// Sleep for `duration`, returning early if the stop signal fires.
async fn pause(duration: Duration, stop: &mut watch::Receiver<bool>) {
    tokio::select! {
        _ = time::sleep(duration) => {}
        Ok(()) = stop.changed() => {}
    }
}
