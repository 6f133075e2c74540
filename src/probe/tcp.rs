//! TCP connect probe.
//!
//! # Responsibilities
//! - Open a TCP connection within the response time budget
//! - Close it immediately; no bytes are exchanged

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time;

use crate::probe::{Probe, ProbeOutcome};

/// Treats an endpoint as healthy when it accepts a TCP connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProbe;

#[async_trait]
impl Probe for TcpProbe {
    fn name(&self) -> &'static str {
        "tcp"
    }

    async fn check(&self, address: SocketAddr, max_response_time: Duration) -> ProbeOutcome {
        match time::timeout(max_response_time, TcpStream::connect(address)).await {
            Ok(Ok(_stream)) => ProbeOutcome::healthy("success"),
            Ok(Err(e)) => {
                tracing::debug!(address = %address, error = %e, "TCP health check failed");
                ProbeOutcome::unhealthy(e.to_string())
            }
            Err(_) => {
                tracing::debug!(address = %address, "TCP health check timed out");
                ProbeOutcome::unhealthy(format!(
                    "connect to {} timed out after {}ms",
                    address,
                    max_response_time.as_millis()
                ))
            }
        }
    }
}
