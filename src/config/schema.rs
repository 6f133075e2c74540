//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the health monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct MonitorConfig {
    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Retention settings applied to endpoints that do not override them.
    pub defaults: RetentionDefaults,

    /// Endpoints to monitor.
    pub endpoints: Vec<EndpointConfig>,
}

/// Fleet-wide retention defaults, in milliseconds.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetentionDefaults {
    /// Baseline interval between checks.
    pub planned_retention_ms: u64,

    /// Upper bound of the backoff.
    pub max_retention_ms: u64,

    /// Time budget of a single probe.
    pub max_response_time_ms: u64,
}

impl Default for RetentionDefaults {
    fn default() -> Self {
        Self {
            planned_retention_ms: 1_000,
            max_retention_ms: 60_000,
            max_response_time_ms: 1_000,
        }
    }
}

/// A single monitored endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Label for logs; defaults to the address.
    #[serde(default)]
    pub name: Option<String>,

    /// Endpoint address (e.g., "127.0.0.1:8080").
    pub address: String,

    /// Probe protocol: "none", "tcp", "http" or "https".
    #[serde(default = "default_protocol")]
    pub protocol: String,

    /// Request path for HTTP(S) probes (default: "/healthz").
    #[serde(default)]
    pub path: Option<String>,

    /// Skip TLS certificate verification for HTTPS probes.
    #[serde(default)]
    pub insecure_skip_verify: bool,

    #[serde(default)]
    pub planned_retention_ms: Option<u64>,

    #[serde(default)]
    pub max_retention_ms: Option<u64>,

    #[serde(default)]
    pub max_response_time_ms: Option<u64>,
}

fn default_protocol() -> String {
    "tcp".to_string()
}

/// Resolved timing parameters of one monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub planned_retention: Duration,
    pub max_retention: Duration,
    pub max_response_time: Duration,
}

impl EndpointConfig {
    /// An endpoint with no overrides.
    pub fn new(address: impl Into<String>, protocol: impl Into<String>) -> Self {
        Self {
            name: None,
            address: address.into(),
            protocol: protocol.into(),
            path: None,
            insecure_skip_verify: false,
            planned_retention_ms: None,
            max_retention_ms: None,
            max_response_time_ms: None,
        }
    }

    /// Name used in logs.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.address)
    }

    /// Apply per-endpoint overrides on top of `defaults`.
    pub fn timings(&self, defaults: &RetentionDefaults) -> Timings {
        let planned = self.planned_retention_ms.unwrap_or(defaults.planned_retention_ms);
        let max = self.max_retention_ms.unwrap_or(defaults.max_retention_ms);
        let response = self.max_response_time_ms.unwrap_or(defaults.max_response_time_ms);

        Timings {
            planned_retention: Duration::from_millis(planned),
            max_retention: Duration::from_millis(max),
            max_response_time: Duration::from_millis(response),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
