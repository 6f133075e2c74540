//! Per-endpoint health state and the check-and-adapt algorithm.
//!
//! # Retention
//! ```text
//! healthy check   → retention = planned_retention + jitter   (jitter ∈ [0, 0.5s))
//! unhealthy check → retention += 1s, while retention < max_retention
//! ```
//!
//! # Design Decisions
//! - Backoff is additive and capped, so the check interval of a dead endpoint
//!   grows predictably
//! - Jitter is a fixed half-second band regardless of the planned retention;
//!   it only exists to spread checks of many endpoints apart
//! - The random source is injected so jitter can be made deterministic

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::health::status::HealthStatus;
use crate::probe::Probe;

/// Retention added after every unhealthy check.
pub const BACKOFF_STEP: Duration = Duration::from_secs(1);

/// Width of the jitter band added to the planned retention after a healthy
/// check.
pub const JITTER_BAND: Duration = Duration::from_millis(500);

/// Upper bound (exclusive) of the random delay before a monitor's first check.
pub const MAX_STARTUP_DELAY: Duration = Duration::from_secs(1);

/// Health record of a single monitored endpoint.
///
/// Owned exclusively by the monitor loop driving it.
pub struct EndpointHealth {
    address: SocketAddr,
    probe: Arc<dyn Probe>,
    healthy: bool,
    last_time_healthy: Option<SystemTime>,
    last_check_at: Option<SystemTime>,
    last_message: String,
    planned_retention: Duration,
    retention: Duration,
    max_retention: Duration,
    max_response_time: Duration,
    rng: Box<dyn RngCore + Send>,
}

impl EndpointHealth {
    /// Create the record. The endpoint starts out unhealthy and unchecked.
    pub fn new(
        address: SocketAddr,
        probe: Arc<dyn Probe>,
        planned_retention: Duration,
        max_retention: Duration,
        max_response_time: Duration,
    ) -> Self {
        Self {
            address,
            probe,
            healthy: false,
            last_time_healthy: None,
            last_check_at: None,
            last_message: String::new(),
            planned_retention,
            retention: planned_retention,
            max_retention,
            max_response_time,
            rng: Box::new(StdRng::from_entropy()),
        }
    }

    /// Replace the random source used for jitter and the startup delay.
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn probe(&self) -> &Arc<dyn Probe> {
        &self.probe
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy
    }

    pub fn last_time_healthy(&self) -> Option<SystemTime> {
        self.last_time_healthy
    }

    pub fn last_check_at(&self) -> Option<SystemTime> {
        self.last_check_at
    }

    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    pub fn planned_retention(&self) -> Duration {
        self.planned_retention
    }

    /// Current interval until the next check.
    pub fn retention(&self) -> Duration {
        self.retention
    }

    pub fn max_retention(&self) -> Duration {
        self.max_retention
    }

    pub fn max_response_time(&self) -> Duration {
        self.max_response_time
    }

    /// Probe the endpoint once and adapt the retention to the outcome.
    ///
    /// Returns the new health.
    pub async fn check_health(&mut self) -> bool {
        let outcome = self.probe.check(self.address, self.max_response_time).await;

        let retention = self.planned_retention + scaled(JITTER_BAND, self.rng.gen::<f64>());

        let now = SystemTime::now();
        self.last_check_at = Some(now);
        self.healthy = outcome.healthy;

        if outcome.healthy {
            self.last_time_healthy = Some(now);
            self.retention = retention;
        } else if self.retention < self.max_retention {
            self.retention += BACKOFF_STEP;
        }

        self.last_message = outcome.message;
        self.healthy
    }

    /// Run one check and describe it as an observation.
    pub async fn observe(&mut self) -> HealthStatus {
        let previous = self.last_check_at.map(|_| self.healthy);
        let healthy = self.check_health().await;

        HealthStatus::new(self.address, previous, healthy, self.last_message.clone())
    }

    /// Random delay in `[0, 1s)` used once before the first check.
    pub(crate) fn startup_delay(&mut self) -> Duration {
        scaled(MAX_STARTUP_DELAY, self.rng.gen::<f64>())
    }
}

/// `span * fraction`, truncated to whole nanoseconds so a fraction below 1
/// never rounds up to the full span.
fn scaled(span: Duration, fraction: f64) -> Duration {
    Duration::from_nanos((span.as_nanos() as f64 * fraction) as u64)
}

impl fmt::Debug for EndpointHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointHealth")
            .field("address", &self.address)
            .field("probe", &self.probe.name())
            .field("healthy", &self.healthy)
            .field("last_time_healthy", &self.last_time_healthy)
            .field("last_check_at", &self.last_check_at)
            .field("last_message", &self.last_message)
            .field("planned_retention", &self.planned_retention)
            .field("retention", &self.retention)
            .field("max_retention", &self.max_retention)
            .field("max_response_time", &self.max_response_time)
            .finish()
    }
}
