//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Monitors and the daemon produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and gauges per endpoint)
//!
//! Consumers:
//!     → stdout (fmt subscriber, filtered by RUST_LOG or config)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Metric updates are no-ops until a recorder is installed
//! - Every event carries the endpoint address as a field or label

pub mod logging;
pub mod metrics;
