//! # GridGate entry point
//!
//! Starts the dispatch front-end: a TCP listener that accepts
//! `<POWMIN> <POWMAX> [engine]` request lines, relays them to compute
//! backends over HTTP, and reports per-request telemetry.
//!
//! ## Usage
//!
//! ```bash
//! # Defaults: listen on 0.0.0.0:8080, openmp and spark backends on
//! # localhost, telemetry to localhost:9200
//! gridgate
//!
//! # Explicit pool and telemetry sink
//! gridgate -b 0.0.0.0:8080 \
//!   --backend openmp=10.0.0.5:8081 \
//!   --backend spark=10.0.0.6:8082 \
//!   --telemetry-host 10.0.0.9
//! ```
//!
//! Backends are given as `name=host:port`; the name is what clients write
//! as the third request token.

use anyhow::Result;
use argh::FromArgs;

use gridgate_dispatcher::{BackendEndpoint, DispatchServer, DispatcherConfig};
use gridgate_metrics::TelemetryEndpoint;

/// GridGate - dispatch front-end for compute backends
#[derive(FromArgs)]
struct Cli {
    /// address to bind the client-facing listener to
    ///
    /// Defaults to "0.0.0.0:8080" for accessibility from other machines.
    #[argh(option, short = 'b', default = "\"0.0.0.0:8080\".into()")]
    bind: String,

    /// compute backend as name=host:port
    ///
    /// Can be specified multiple times. Clients select a backend by name or
    /// get round-robin with "auto". Defaults to openmp=127.0.0.1:8081 and
    /// spark=127.0.0.1:8082 when none are given.
    #[argh(option, long = "backend")]
    backends: Vec<String>,

    /// path requested on compute backends
    #[argh(option, long = "backend-path", default = "\"/process\".into()")]
    backend_path: String,

    /// host of the telemetry sink
    #[argh(option, long = "telemetry-host", default = "\"127.0.0.1\".into()")]
    telemetry_host: String,

    /// port of the telemetry sink
    #[argh(option, long = "telemetry-port", default = "9200")]
    telemetry_port: u16,

    /// ingestion path on the telemetry sink
    #[argh(option, long = "telemetry-index", default = "\"/gridgate-metrics/_doc\".into()")]
    telemetry_index: String,

    /// optional ceiling on concurrent client sessions
    ///
    /// Unset means one task per connection with no admission limit.
    #[argh(option, long = "max-connections")]
    max_connections: Option<usize>,
}

/// Parses a `name=host:port` backend flag.
fn parse_backend(value: &str) -> Result<BackendEndpoint> {
    let (name, addr) = value
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("invalid backend '{}': expected name=host:port", value))?;
    let (host, port) = addr
        .rsplit_once(':')
        .ok_or_else(|| anyhow::anyhow!("invalid backend '{}': expected name=host:port", value))?;
    let port: u16 = port
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid backend port in '{}': {}", value, e))?;

    if name.is_empty() || host.is_empty() {
        return Err(anyhow::anyhow!(
            "invalid backend '{}': name and host must be non-empty",
            value
        ));
    }

    Ok(BackendEndpoint::new(name, host, port))
}

fn build_config(cli: Cli) -> Result<DispatcherConfig> {
    let backends = if cli.backends.is_empty() {
        DispatcherConfig::default().backends
    } else {
        cli.backends
            .iter()
            .map(|value| parse_backend(value))
            .collect::<Result<Vec<_>>>()?
    };

    Ok(DispatcherConfig {
        bind: cli.bind,
        backends,
        backend_path: cli.backend_path,
        telemetry: TelemetryEndpoint {
            host: cli.telemetry_host,
            port: cli.telemetry_port,
            index_path: cli.telemetry_index,
        },
        max_connections: cli.max_connections,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    // Default log level INFO, RUST_LOG overrides.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();

    let config = build_config(cli)?;
    tracing::info!("Starting GridGate dispatcher");

    let server = DispatchServer::bind(config).await?;
    server.serve().await?;

    Ok(())
}
