//! Scripted probes and deterministic random sources for monitor tests.

use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::mock::StepRng;

use crate::probe::{Probe, ProbeOutcome};

type Script = Box<dyn Fn(usize) -> (String, bool) + Send + Sync>;

/// Probe whose outcome is computed from the 1-based call number.
pub(crate) struct MockProbe {
    script: Script,
    delay: Duration,
    started: AtomicUsize,
    completed: AtomicUsize,
}

impl MockProbe {
    pub(crate) fn new<F>(script: F) -> Arc<Self>
    where
        F: Fn(usize) -> (String, bool) + Send + Sync + 'static,
    {
        Self::with_delay(Duration::ZERO, script)
    }

    /// Like [`MockProbe::new`], with every check taking `delay` (Tokio time).
    pub(crate) fn with_delay<F>(delay: Duration, script: F) -> Arc<Self>
    where
        F: Fn(usize) -> (String, bool) + Send + Sync + 'static,
    {
        Arc::new(Self {
            script: Box::new(script),
            delay,
            started: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        })
    }

    pub(crate) fn always(healthy: bool) -> Arc<Self> {
        Self::new(move |_| ("message".to_string(), healthy))
    }

    pub(crate) fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub(crate) fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for MockProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockProbe")
            .field("delay", &self.delay)
            .field("started", &self.started())
            .field("completed", &self.completed())
            .finish()
    }
}

#[async_trait]
impl Probe for MockProbe {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn check(&self, _address: SocketAddr, _max_response_time: Duration) -> ProbeOutcome {
        let call = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let (message, healthy) = (self.script)(call);
        self.completed.fetch_add(1, Ordering::SeqCst);
        ProbeOutcome { message, healthy }
    }
}

/// Random source that always yields 0.0: no jitter, no startup delay.
pub(crate) fn zero_jitter() -> StepRng {
    StepRng::new(0, 0)
}

/// Random source that always yields the largest `f64` below 1.0.
pub(crate) fn max_jitter() -> StepRng {
    StepRng::new(u64::MAX, 0)
}
