//! Endpoint health monitor library.
//!
//! Runs one adaptive polling loop per endpoint and reports every check
//! outcome, flagging health transitions.

pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod probe;

pub use config::schema::MonitorConfig;
pub use health::{HealthStatus, Monitor, MonitorFleet, StopHandle};
pub use lifecycle::Shutdown;
pub use probe::{provider_from_name, Probe, ProbeError, ProbeOutcome};
