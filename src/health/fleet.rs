//! Owner of the running monitors.
//!
//! # Responsibilities
//! - Start one monitor per configured endpoint
//! - Fan all observation streams into a single channel for the daemon
//! - Reconcile the running set against a (re)loaded configuration
//! - Stop monitors individually or all at once
//!
//! # Design Decisions
//! - Keyed by endpoint address: at most one monitor per address
//! - Observations are forwarded as-is; every one still names its endpoint
//! - Unchanged endpoints keep their monitor (and its backoff state) across a
//!   reload; changed endpoints are restarted from scratch

use std::collections::HashMap;
use std::net::SocketAddr;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::{EndpointConfig, MonitorConfig, RetentionDefaults, Timings};
use crate::health::monitor::{Monitor, MonitorHandle};
use crate::health::status::HealthStatus;
use crate::probe::{build_probe, ProbeError};

/// Errors raised when a monitor cannot be started.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("invalid endpoint address `{0}`")]
    InvalidAddress(String),

    #[error(transparent)]
    Probe(#[from] ProbeError),
}

/// Outcome of [`MonitorFleet::reconcile`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub started: usize,
    pub stopped: usize,
    pub unchanged: usize,
    pub failed: usize,
}

struct FleetEntry {
    endpoint: EndpointConfig,
    timings: Timings,
    handle: MonitorHandle,
    forwarder: JoinHandle<()>,
}

/// A set of monitors sharing one outgoing observation channel.
pub struct MonitorFleet {
    monitors: HashMap<SocketAddr, FleetEntry>,
    status_tx: mpsc::Sender<HealthStatus>,
}

impl MonitorFleet {
    /// Create an empty fleet and the receiver all observations arrive on.
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<HealthStatus>) {
        let (status_tx, status_rx) = mpsc::channel(buffer.max(1));
        (
            Self {
                monitors: HashMap::new(),
                status_tx,
            },
            status_rx,
        )
    }

    /// Start monitoring an endpoint, replacing any monitor already running
    /// for the same address.
    pub fn start(&mut self, endpoint: &EndpointConfig, defaults: &RetentionDefaults) -> Result<SocketAddr, FleetError> {
        let address: SocketAddr = endpoint
            .address
            .parse()
            .map_err(|_| FleetError::InvalidAddress(endpoint.address.clone()))?;
        let probe = build_probe(endpoint)?;
        let timings = endpoint.timings(defaults);

        let monitor = Monitor::new(
            address,
            probe,
            timings.planned_retention,
            timings.max_retention,
            timings.max_response_time,
        );
        let (handle, status_rx) = monitor.start();
        let forwarder = tokio::spawn(forward(status_rx, self.status_tx.clone()));

        let entry = FleetEntry {
            endpoint: endpoint.clone(),
            timings,
            handle,
            forwarder,
        };
        if let Some(previous) = self.monitors.insert(address, entry) {
            previous.handle.stop();
            tracing::debug!(address = %address, "Replaced running monitor");
        }

        tracing::info!(
            endpoint = %endpoint.label(),
            address = %address,
            protocol = %endpoint.protocol,
            planned_retention_ms = timings.planned_retention.as_millis() as u64,
            "Monitor started"
        );
        Ok(address)
    }

    /// Signal the monitor for `address` to stop. Its remaining observations
    /// are still delivered. Returns false if nothing was running there.
    pub fn stop(&mut self, address: SocketAddr) -> bool {
        match self.monitors.remove(&address) {
            Some(entry) => {
                entry.handle.stop();
                tracing::info!(address = %address, "Monitor stopped");
                true
            }
            None => false,
        }
    }

    /// Stop every monitor and wait for their loops to finish.
    ///
    /// Observations still in flight are discarded.
    pub async fn stop_all(&mut self) {
        let entries: Vec<FleetEntry> = self.monitors.drain().map(|(_, entry)| entry).collect();

        for entry in &entries {
            entry.handle.stop();
            entry.forwarder.abort();
        }

        for entry in entries {
            let address = entry.handle.address();
            if let Err(e) = entry.handle.join().await {
                tracing::warn!(address = %address, error = %e, "Monitor task did not finish cleanly");
            }
        }

        tracing::info!("All monitors stopped");
    }

    pub fn is_monitoring(&self, address: SocketAddr) -> bool {
        self.monitors.contains_key(&address)
    }

    /// Addresses with a running monitor, sorted.
    pub fn active_endpoints(&self) -> Vec<SocketAddr> {
        let mut addresses: Vec<SocketAddr> = self.monitors.keys().copied().collect();
        addresses.sort();
        addresses
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Bring the running monitors in line with `config`.
    ///
    /// Endpoints that disappeared are stopped, new ones started, and ones
    /// whose settings changed are restarted.
    pub fn reconcile(&mut self, config: &MonitorConfig) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();
        let defaults = &config.defaults;

        let mut desired: HashMap<SocketAddr, &EndpointConfig> = HashMap::new();
        for endpoint in &config.endpoints {
            match endpoint.address.parse::<SocketAddr>() {
                Ok(address) => {
                    desired.insert(address, endpoint);
                }
                Err(_) => {
                    tracing::error!(endpoint = %endpoint.label(), address = %endpoint.address, "Invalid endpoint address, skipping");
                    summary.failed += 1;
                }
            }
        }

        let outdated: Vec<SocketAddr> = self
            .monitors
            .iter()
            .filter(|(address, entry)| match desired.get(*address) {
                Some(endpoint) => **endpoint != entry.endpoint || endpoint.timings(defaults) != entry.timings,
                None => true,
            })
            .map(|(address, _)| *address)
            .collect();

        for address in outdated {
            self.stop(address);
            summary.stopped += 1;
        }

        for (address, endpoint) in desired {
            if self.monitors.contains_key(&address) {
                summary.unchanged += 1;
                continue;
            }
            match self.start(endpoint, defaults) {
                Ok(_) => summary.started += 1,
                Err(e) => {
                    tracing::error!(endpoint = %endpoint.label(), error = %e, "Failed to start monitor");
                    summary.failed += 1;
                }
            }
        }

        summary
    }
}

impl Drop for MonitorFleet {
    fn drop(&mut self) {
        for entry in self.monitors.values() {
            entry.handle.stop();
        }
    }
}

async fn forward(mut status_rx: mpsc::Receiver<HealthStatus>, status_tx: mpsc::Sender<HealthStatus>) {
    while let Some(status) = status_rx.recv().await {
        if status_tx.send(status).await.is_err() {
            break;
        }
    }
}
