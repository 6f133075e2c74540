//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → daemon loop leaves → fleet.stop_all() → exit
//! ```
//!
//! # Design Decisions
//! - One coordinator, any number of listeners
//! - A late subscriber still observes a shutdown that already happened

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
