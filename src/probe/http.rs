//! HTTP and HTTPS GET probe.
//!
//! # Responsibilities
//! - Issue `GET scheme://ip:port/path` within the response time budget
//! - Treat any 2xx status as healthy, everything else as unhealthy
//! - Optionally skip TLS certificate verification for HTTPS
//!
//! # Design Decisions
//! - One client per probe, no idle connection pooling: every check opens a
//!   fresh connection so a half-dead backend cannot hide behind a kept-alive
//!   socket
//! - Proxy environment variables are ignored; checks go straight to the IP

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::probe::{Probe, ProbeError, ProbeOutcome};

/// Path probed when none is configured.
pub const DEFAULT_HEALTH_PATH: &str = "/healthz";

/// Monitors an endpoint through an HTTP(S) GET request.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
    https: bool,
    path: String,
}

impl HttpProbe {
    /// Create a probe. `path` defaults to `/healthz`; a leading `/` is added
    /// when missing.
    pub fn new(https: bool, insecure_skip_verify: bool, path: Option<&str>) -> Result<Self, ProbeError> {
        let mut builder = reqwest::Client::builder()
            .no_proxy()
            .pool_max_idle_per_host(0)
            .user_agent(concat!("health-monitor/", env!("CARGO_PKG_VERSION")));

        if insecure_skip_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            client: builder.build()?,
            https,
            path: normalize_path(path),
        })
    }

    /// The request path, always starting with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_https(&self) -> bool {
        self.https
    }

    fn target_url(&self, address: SocketAddr) -> Result<Url, url::ParseError> {
        let scheme = if self.https { "https" } else { "http" };
        Url::parse(&format!("{}://{}{}", scheme, address, self.path))
    }
}

fn normalize_path(path: Option<&str>) -> String {
    match path {
        None | Some("") => DEFAULT_HEALTH_PATH.to_string(),
        Some(p) if p.starts_with('/') => p.to_string(),
        Some(p) => format!("/{}", p),
    }
}

#[async_trait]
impl Probe for HttpProbe {
    fn name(&self) -> &'static str {
        if self.https {
            "https"
        } else {
            "http"
        }
    }

    async fn check(&self, address: SocketAddr, max_response_time: Duration) -> ProbeOutcome {
        let url = match self.target_url(address) {
            Ok(url) => url,
            Err(e) => return ProbeOutcome::unhealthy(format!("invalid health check url: {}", e)),
        };

        let response = self
            .client
            .get(url)
            .timeout(max_response_time)
            .send()
            .await;

        match response {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    ProbeOutcome::healthy("success")
                } else {
                    tracing::debug!(address = %address, status = %status, "HTTP health check failed: non-success status");
                    ProbeOutcome::unhealthy(format!("status code is `{}`", status.as_u16()))
                }
            }
            Err(e) => {
                tracing::debug!(address = %address, error = %e, "HTTP health check failed: request error");
                ProbeOutcome::unhealthy(e.to_string())
            }
        }
    }
}
