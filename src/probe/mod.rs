//! Health probe subsystem.
//!
//! # Data Flow
//! ```text
//! protocol name ("none" | "tcp" | "http" | "https")
//!     → ProbeKind::from_name (trim + lowercase lookup)
//!     → build_probe / provider_from_name
//!     → Arc<dyn Probe> bound to a monitor
//!
//! Per check:
//!     monitor → Probe::check(address, max_response_time)
//!     → ProbeOutcome { message, healthy }
//! ```
//!
//! # Design Decisions
//! - Network failures are outcomes, not errors: refused connections, timeouts
//!   and non-2xx responses all come back as `healthy = false`
//! - Only setup problems (unknown protocol, client construction) are errors
//! - The set of probes is closed; there is no plugin registry

pub mod http;
pub mod none;
pub mod tcp;

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::EndpointConfig;

pub use self::http::HttpProbe;
pub use self::none::NoneProbe;
pub use self::tcp::TcpProbe;

/// Errors raised while selecting or constructing a probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The configured protocol name has no probe behind it.
    #[error("unknown health check protocol `{0}`, use one of \"none\", \"tcp\", \"http\" or \"https\"")]
    UnsupportedProtocol(String),

    /// The HTTP client backing an HTTP(S) probe could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Result of a single probe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// Human-readable diagnostic, not interpreted by the monitor.
    pub message: String,
    /// Whether the endpoint is considered healthy.
    pub healthy: bool,
}

impl ProbeOutcome {
    pub fn healthy(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            healthy: true,
        }
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            healthy: false,
        }
    }
}

/// A capability that decides whether an endpoint is reachable and healthy.
///
/// Implementations must not take longer than `max_response_time` for
/// network-bound checks and must report ordinary network failures as an
/// unhealthy outcome instead of panicking.
#[async_trait]
pub trait Probe: Send + Sync + fmt::Debug {
    /// Short protocol name, used in logs.
    fn name(&self) -> &'static str;

    /// Probe `address` once.
    async fn check(&self, address: SocketAddr, max_response_time: Duration) -> ProbeOutcome;
}

/// The supported probe protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeKind {
    None,
    Tcp,
    Http,
    Https,
}

impl ProbeKind {
    /// Resolve a protocol name. Matching is case-insensitive and ignores
    /// surrounding whitespace.
    pub fn from_name(name: &str) -> Result<Self, ProbeError> {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "none" => Ok(ProbeKind::None),
            "tcp" => Ok(ProbeKind::Tcp),
            "http" => Ok(ProbeKind::Http),
            "https" => Ok(ProbeKind::Https),
            _ => Err(ProbeError::UnsupportedProtocol(name)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeKind::None => "none",
            ProbeKind::Tcp => "tcp",
            ProbeKind::Http => "http",
            ProbeKind::Https => "https",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Look up a probe with default settings by protocol name.
pub fn provider_from_name(name: &str) -> Result<Arc<dyn Probe>, ProbeError> {
    let probe: Arc<dyn Probe> = match ProbeKind::from_name(name)? {
        ProbeKind::None => Arc::new(NoneProbe),
        ProbeKind::Tcp => Arc::new(TcpProbe),
        ProbeKind::Http => Arc::new(HttpProbe::new(false, false, None)?),
        ProbeKind::Https => Arc::new(HttpProbe::new(true, false, None)?),
    };
    Ok(probe)
}

/// Build the probe described by an endpoint's configuration.
///
/// Same lookup as [`provider_from_name`], with the endpoint's HTTP path and
/// TLS verification settings applied to HTTP(S) probes.
pub fn build_probe(endpoint: &EndpointConfig) -> Result<Arc<dyn Probe>, ProbeError> {
    let path = endpoint.path.as_deref();
    let insecure = endpoint.insecure_skip_verify;

    let probe: Arc<dyn Probe> = match ProbeKind::from_name(&endpoint.protocol)? {
        ProbeKind::None => Arc::new(NoneProbe),
        ProbeKind::Tcp => Arc::new(TcpProbe),
        ProbeKind::Http => Arc::new(HttpProbe::new(false, insecure, path)?),
        ProbeKind::Https => Arc::new(HttpProbe::new(true, insecure, path)?),
    };
    Ok(probe)
}
