//! Observations emitted by a monitor, one per completed check.

use std::fmt;
use std::net::SocketAddr;

use serde::Serialize;

/// The outcome of a single check of one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub address: SocketAddr,
    pub healthy: bool,
    pub message: String,
    /// True for the first observation of an endpoint, or when `healthy`
    /// differs from the previous observation.
    pub did_change: bool,
}

impl HealthStatus {
    /// Build the observation for a check.
    ///
    /// `previous` is the health reported by the preceding check, `None` if
    /// this is the first one.
    pub fn new(address: SocketAddr, previous: Option<bool>, healthy: bool, message: impl Into<String>) -> Self {
        Self {
            address,
            healthy,
            message: message.into(),
            did_change: previous != Some(healthy),
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.healthy { "UP" } else { "DOWN" };
        write!(f, "{} {} - {}", sign, self.address, self.message)
    }
}
