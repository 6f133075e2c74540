use std::net::SocketAddr;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use health_monitor::config::EndpointConfig;
use health_monitor::health::HealthStatus;
use health_monitor::probe::build_probe;

#[derive(Parser)]
#[command(name = "probe-cli")]
#[command(about = "Run a single health check against an endpoint", long_about = None)]
struct Cli {
    /// Probe protocol: none, tcp, http or https
    protocol: String,

    /// Endpoint address (ip:port)
    address: SocketAddr,

    /// Request path for HTTP(S) probes
    #[arg(long)]
    path: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long)]
    insecure: bool,

    /// Time budget for the check
    #[arg(short, long, default_value_t = 1000)]
    timeout_ms: u64,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut endpoint = EndpointConfig::new(cli.address.to_string(), cli.protocol);
    endpoint.path = cli.path;
    endpoint.insecure_skip_verify = cli.insecure;

    let probe = build_probe(&endpoint)?;
    let outcome = probe.check(cli.address, Duration::from_millis(cli.timeout_ms)).await;
    let status = HealthStatus::new(cli.address, None, outcome.healthy, outcome.message);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("{}", status);
    }

    Ok(if status.healthy {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
