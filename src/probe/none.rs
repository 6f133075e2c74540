//! No-op probe.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;

use crate::probe::{Probe, ProbeOutcome};

/// Does no checking at all and always reports the endpoint as up.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneProbe;

#[async_trait]
impl Probe for NoneProbe {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn check(&self, _address: SocketAddr, _max_response_time: Duration) -> ProbeOutcome {
        ProbeOutcome::healthy("unknown")
    }
}
