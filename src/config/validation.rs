//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Endpoint addresses parse as `ip:port` and are unique
//! - Protocol names map to a probe
//! - Timings are positive and the backoff cap is not below the baseline
//! - The log level is one the log filter understands
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

use crate::config::schema::{EndpointConfig, MonitorConfig, RetentionDefaults};
use crate::probe::ProbeKind;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("endpoint `{endpoint}`: invalid address `{address}`, expected ip:port")]
    InvalidAddress { endpoint: String, address: String },

    #[error("endpoint `{endpoint}`: unsupported protocol `{protocol}`")]
    UnsupportedProtocol { endpoint: String, protocol: String },

    #[error("endpoint `{endpoint}`: {field} must be greater than zero")]
    ZeroDuration { endpoint: String, field: &'static str },

    #[error("endpoint `{endpoint}`: max retention {max_ms}ms is below planned retention {planned_ms}ms")]
    RetentionBounds { endpoint: String, planned_ms: u64, max_ms: u64 },

    #[error("duplicate endpoint address `{0}`")]
    DuplicateAddress(SocketAddr),

    #[error("invalid metrics address `{0}`")]
    InvalidMetricsAddress(String),

    #[error("invalid log level `{0}`, use one of off, error, warn, info, debug or trace")]
    InvalidLogLevel(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for endpoint in &config.endpoints {
        match endpoint.address.parse::<SocketAddr>() {
            Ok(address) => {
                if !seen.insert(address) {
                    errors.push(ValidationError::DuplicateAddress(address));
                }
            }
            Err(_) => errors.push(ValidationError::InvalidAddress {
                endpoint: endpoint.label().to_string(),
                address: endpoint.address.clone(),
            }),
        }

        if ProbeKind::from_name(&endpoint.protocol).is_err() {
            errors.push(ValidationError::UnsupportedProtocol {
                endpoint: endpoint.label().to_string(),
                protocol: endpoint.protocol.clone(),
            });
        }

        validate_timings(endpoint, &config.defaults, &mut errors);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.observability.log_level.trim().parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_timings(endpoint: &EndpointConfig, defaults: &RetentionDefaults, errors: &mut Vec<ValidationError>) {
    let planned = endpoint.planned_retention_ms.unwrap_or(defaults.planned_retention_ms);
    let max = endpoint.max_retention_ms.unwrap_or(defaults.max_retention_ms);
    let response = endpoint.max_response_time_ms.unwrap_or(defaults.max_response_time_ms);

    for (field, value) in [
        ("planned_retention_ms", planned),
        ("max_retention_ms", max),
        ("max_response_time_ms", response),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroDuration {
                endpoint: endpoint.label().to_string(),
                field,
            });
        }
    }

    if max < planned {
        errors.push(ValidationError::RetentionBounds {
            endpoint: endpoint.label().to_string(),
            planned_ms: planned,
            max_ms: max,
        });
    }
}
