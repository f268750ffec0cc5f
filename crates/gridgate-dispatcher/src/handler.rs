//! Per-connection session handling.
//!
//! A session is one request line, one dispatch, one reply. The flow is
//! strictly ordered: receive, parse, validate, select, relay, report
//! telemetry, respond, close. Session accounting brackets the whole thing;
//! every exit path releases the active-connection slot exactly once.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::relay;
use crate::server::DispatchContext;
use gridgate_common::protocol::{request::WorkRequest, response};
use gridgate_common::GridgateError;
use gridgate_metrics::MetricsRecord;

/// Bound on the request line; anything longer is malformed anyway.
const MAX_LINE: u64 = 2048;

/// Engine label recorded when the request never parsed.
const ENGINE_UNKNOWN: &str = "unknown";

/// Runs one client session from accept to close.
///
/// Never returns an error: whatever happens inside stays inside the
/// session, and the accept loop must keep going regardless.
pub async fn handle_connection(ctx: Arc<DispatchContext>, stream: TcpStream, peer: SocketAddr) {
    let request_id = ctx.stats.begin_session();

    if let Err(e) = run_session(&ctx, stream, peer, request_id).await {
        debug!(request_id, error = %e, "session ended with write error");
    }

    ctx.stats.end_session();
}

/// The session body. Errors here are reply-write failures only; all
/// dispatch-level failures are converted into client replies.
async fn run_session(
    ctx: &DispatchContext,
    stream: TcpStream,
    peer: SocketAddr,
    request_id: u64,
) -> std::io::Result<()> {
    let client_ip = peer.ip().to_string();
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half).take(MAX_LINE);

    let mut line = String::new();
    match reader.read_line(&mut line).await {
        Ok(0) | Err(_) => {
            // Nothing was received, so nothing is owed: no reply, no
            // telemetry record.
            debug!(request_id, client = %client_ip, "connection closed before a request arrived");
            return Ok(());
        }
        Ok(_) => {}
    }

    // Processing time covers everything after the request is in hand.
    let started = Instant::now();

    let request = match WorkRequest::parse(&line) {
        Ok(request) => request,
        Err(e) => {
            info!(request_id, client = %client_ip, "rejected malformed request");
            report_rejection(ctx, request_id, &client_ip, ENGINE_UNKNOWN, 0, 0, &e, started)
                .await;
            write_half
                .write_all(response::render_usage_error().as_bytes())
                .await?;
            return write_half.shutdown().await;
        }
    };

    if let Err(e) = request.validate() {
        info!(
            request_id,
            client = %client_ip,
            powmin = request.powmin,
            powmax = request.powmax,
            "rejected out-of-range request"
        );
        report_rejection(
            ctx,
            request_id,
            &client_ip,
            &request.engine,
            request.powmin,
            request.powmax,
            &e,
            started,
        )
        .await;
        write_half
            .write_all(response::render_usage_error().as_bytes())
            .await?;
        return write_half.shutdown().await;
    }

    let (engine, outcome) = match ctx.selector.select(&request.engine) {
        Some(backend) => {
            debug!(
                request_id,
                engine = %backend.name,
                backend = %backend.addr(),
                "dispatching to backend"
            );
            let outcome =
                relay::call(backend, &ctx.backend_path, request.powmin, request.powmax).await;
            (backend.name.clone(), outcome)
        }
        None => (
            request.engine.clone(),
            Err(GridgateError::Connection("no backend available".to_string())),
        ),
    };

    let processing_time = started.elapsed().as_secs_f64();
    let snapshot = ctx.stats.snapshot();

    let record = MetricsRecord {
        timestamp: MetricsRecord::iso_timestamp(),
        engine: engine.clone(),
        powmin: request.powmin,
        powmax: request.powmax,
        request_id,
        success: outcome.is_ok(),
        processing_time,
        client_ip: client_ip.clone(),
        active_clients: snapshot.active_connections,
        total_requests: snapshot.total_requests,
        error: outcome.as_ref().err().map(|e| e.client_text()),
    };
    ctx.reporter.report(&record).await;

    let reply = match &outcome {
        Ok(payload) => {
            info!(
                request_id,
                engine = %engine,
                elapsed_s = processing_time,
                "request completed"
            );
            response::render_success(&engine, request.powmin, request.powmax, request_id, payload)
        }
        Err(e) => {
            warn!(request_id, engine = %engine, error = %e, "dispatch failed");
            response::render_failure(
                &engine,
                request.powmin,
                request.powmax,
                request_id,
                &e.client_text(),
            )
        }
    };

    write_half.write_all(reply.as_bytes()).await?;
    write_half.shutdown().await
}

/// Telemetry for a request that never reached a backend.
#[allow(clippy::too_many_arguments)]
async fn report_rejection(
    ctx: &DispatchContext,
    request_id: u64,
    client_ip: &str,
    engine: &str,
    powmin: i32,
    powmax: i32,
    error: &GridgateError,
    started: Instant,
) {
    let snapshot = ctx.stats.snapshot();
    let record = MetricsRecord {
        timestamp: MetricsRecord::iso_timestamp(),
        engine: engine.to_string(),
        powmin,
        powmax,
        request_id,
        success: false,
        processing_time: started.elapsed().as_secs_f64(),
        client_ip: client_ip.to_string(),
        active_clients: snapshot.active_connections,
        total_requests: snapshot.total_requests,
        error: Some(error.client_text()),
    };
    ctx.reporter.report(&record).await;
}
