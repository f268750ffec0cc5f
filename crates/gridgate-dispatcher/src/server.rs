//! Listener setup and the accept loop.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::DispatcherConfig;
use crate::handler;
use crate::selector::BackendSelector;
use gridgate_common::Result;
use gridgate_metrics::{StatsRegistry, TelemetryReporter};

/// Shared state handed to every session.
#[derive(Debug)]
pub struct DispatchContext {
    pub selector: BackendSelector,
    pub stats: Arc<StatsRegistry>,
    pub reporter: TelemetryReporter,
    pub backend_path: String,
}

/// The client-facing dispatch server.
///
/// Binds eagerly so misconfiguration fails at startup, then serves
/// connections until the process is terminated. Each accepted connection
/// gets its own task; a failed session never affects the accept loop.
pub struct DispatchServer {
    listener: TcpListener,
    ctx: Arc<DispatchContext>,
    limiter: Option<Arc<Semaphore>>,
}

impl DispatchServer {
    /// Binds the listener and assembles the shared dispatch state.
    pub async fn bind(config: DispatcherConfig) -> Result<Self> {
        let listener = TcpListener::bind(&config.bind).await?;

        info!(bind = %config.bind, "listener bound");
        for backend in &config.backends {
            info!(engine = %backend.name, addr = %backend.addr(), "backend registered");
        }
        info!(
            host = %config.telemetry.host,
            port = config.telemetry.port,
            path = %config.telemetry.index_path,
            "telemetry sink configured"
        );

        let ctx = Arc::new(DispatchContext {
            selector: BackendSelector::new(config.backends),
            stats: Arc::new(StatsRegistry::new()),
            reporter: TelemetryReporter::new(config.telemetry),
            backend_path: config.backend_path,
        });

        let limiter = config
            .max_connections
            .map(|n| Arc::new(Semaphore::new(n)));
        if let Some(n) = config.max_connections {
            info!(max_connections = n, "session ceiling enabled");
        }

        Ok(Self {
            listener,
            ctx,
            limiter,
        })
    }

    /// The address the listener actually bound, useful when binding port 0.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle to the session counters.
    pub fn stats(&self) -> Arc<StatsRegistry> {
        self.ctx.stats.clone()
    }

    /// Accepts connections forever, one task per session.
    pub async fn serve(self) -> Result<()> {
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    // Transient accept failures must not end the server.
                    error!(error = %e, "accept failed");
                    continue;
                }
            };

            let permit = match &self.limiter {
                Some(limiter) => match limiter.clone().acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(_) => {
                        warn!("session limiter closed, refusing connection");
                        continue;
                    }
                },
                None => None,
            };

            let ctx = self.ctx.clone();
            tokio::spawn(async move {
                handler::handle_connection(ctx, stream, peer).await;
                drop(permit);
            });
        }
    }
}
