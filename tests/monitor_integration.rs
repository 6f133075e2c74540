//! End-to-end checks of monitors against real sockets.

mod common;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use std::time::Duration;

use health_monitor::config::loader::parse_config;
use health_monitor::health::{HealthStatus, Monitor, MonitorFleet};
use health_monitor::probe::provider_from_name;
use tokio::sync::mpsc;
use tokio::time::timeout;

const SECOND: Duration = Duration::from_secs(1);

async fn next(rx: &mut mpsc::Receiver<HealthStatus>) -> HealthStatus {
    timeout(5 * SECOND, rx.recv())
        .await
        .expect("timed out waiting for an observation")
        .expect("observation stream closed")
}

fn monitor(address: SocketAddr, protocol: &str, planned: Duration) -> Monitor {
    Monitor::new(address, provider_from_name(protocol).unwrap(), planned, 60 * SECOND, SECOND)
}

#[tokio::test]
async fn test_tcp_monitor_reports_live_listener() {
    let addr = common::start_tcp_backend().await;
    let (handle, mut rx) = monitor(addr, "tcp", Duration::from_millis(100)).start();

    let first = next(&mut rx).await;
    assert_eq!(first.address, addr);
    assert!(first.healthy);
    assert!(first.did_change);
    assert_eq!(first.message, "success");

    let second = next(&mut rx).await;
    assert!(second.healthy);
    assert!(!second.did_change);

    handle.stop();
    let drained = timeout(5 * SECOND, async {
        while rx.recv().await.is_some() {}
    })
    .await;
    assert!(drained.is_ok(), "stream did not close after stop");
}

#[tokio::test]
async fn test_tcp_monitor_reports_closed_port() {
    let addr = common::closed_port().await;
    let (handle, mut rx) = monitor(addr, "tcp", Duration::from_millis(100)).start();

    let first = next(&mut rx).await;
    assert!(!first.healthy);
    assert!(first.did_change);

    handle.stop();
    let state = timeout(5 * SECOND, handle.join()).await.unwrap().unwrap();
    assert!(!state.is_healthy());
    assert!(state.last_time_healthy().is_none());
    assert_eq!(state.retention(), Duration::from_millis(1100));
}

#[tokio::test]
async fn test_http_monitor_reports_transition() {
    let status = Arc::new(AtomicU16::new(200));
    let addr = {
        let status = status.clone();
        common::start_programmable_backend(move || {
            let code = status.load(Ordering::SeqCst);
            async move { (code, "state".to_string()) }
        })
        .await
    };

    let (handle, mut rx) = monitor(addr, "http", Duration::from_millis(100)).start();

    let first = next(&mut rx).await;
    assert!(first.healthy, "unexpected first observation: {}", first);
    assert!(first.did_change);
    assert_eq!(first.message, "success");

    status.store(503, Ordering::SeqCst);

    let down = loop {
        let observation = next(&mut rx).await;
        if !observation.healthy {
            break observation;
        }
        assert!(!observation.did_change);
    };
    assert!(down.did_change);
    assert_eq!(down.message, "status code is `503`");
    assert_eq!(down.to_string(), format!("DOWN {} - status code is `503`", addr));

    status.store(200, Ordering::SeqCst);

    let up = loop {
        let observation = next(&mut rx).await;
        if observation.healthy {
            break observation;
        }
        assert!(!observation.did_change);
    };
    assert!(up.did_change);

    handle.stop();
    timeout(5 * SECOND, handle.join()).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_fleet_runs_configured_endpoints() {
    let tcp = common::start_tcp_backend().await;
    let http = common::start_http_backend(200).await;

    let config = parse_config(&format!(
        r#"
        [defaults]
        planned_retention_ms = 100

        [[endpoints]]
        address = "{tcp}"

        [[endpoints]]
        name = "web"
        address = "{http}"
        protocol = "http"
        path = "status"
        "#
    ))
    .unwrap();

    let (mut fleet, mut statuses) = MonitorFleet::new(8);
    let summary = fleet.reconcile(&config);
    assert_eq!(summary.started, 2);

    let mut first_seen = std::collections::HashMap::new();
    while first_seen.len() < 2 {
        let status = next(&mut statuses).await;
        first_seen.entry(status.address).or_insert(status);
    }

    for addr in [tcp, http] {
        let status = &first_seen[&addr];
        assert!(status.healthy, "{}", status);
        assert!(status.did_change);
    }

    fleet.stop_all().await;
    assert!(fleet.is_empty());
}
