//! Health monitoring subsystem.
//!
//! # Data Flow
//! ```text
//! Per endpoint (monitor.rs):
//!     Random startup delay
//!     → state.rs: probe once, adapt retention (jitter / additive backoff)
//!     → status.rs: HealthStatus { healthy, message, did_change }
//!     → publish to the subscriber
//!     → sleep(retention), repeat until stopped
//!
//! Many endpoints (fleet.rs):
//!     EndpointConfig[]
//!     → one Monitor per address
//!     → observations fanned into one channel
//!     → reconcile on config reload
//! ```
//!
//! # Design Decisions
//! - One task per endpoint, no shared mutable state between monitors
//! - Probe failures are data: they feed the backoff, never end the loop
//! - The only way to end a loop is the stop signal (or losing the subscriber)
//! - Change detection needs only the previous and current health

pub mod fleet;
pub mod monitor;
pub mod state;
pub mod status;

#[cfg(test)]
pub(crate) mod testing;

pub use fleet::{FleetError, MonitorFleet, ReconcileSummary};
pub use monitor::{Monitor, MonitorHandle, StopHandle};
pub use state::EndpointHealth;
pub use status::HealthStatus;
