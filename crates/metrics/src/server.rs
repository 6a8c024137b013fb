//! Prometheus metrics HTTP server.
//!
//! Serves `/metrics` and `/health` and shuts down cleanly when the
//! process-wide cancellation token fires, matching how the queue consumer
//! winds down.

use crate::REGISTRY;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use prometheus::Encoder;
use std::convert::Infallible;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

fn text_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::from(body)))
        .expect("static response builds")
}

async fn handle_request(
    req: Request<hyper::body::Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    match req.uri().path() {
        "/metrics" => {
            let encoder = prometheus::TextEncoder::new();
            let mut buffer = Vec::new();
            if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
                error!(error = %e, "failed to encode metrics");
                return Ok(text_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "encoding failed",
                ));
            }
            Ok(Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", encoder.format_type())
                .body(Full::new(Bytes::from(buffer)))
                .expect("metrics response builds"))
        }
        "/health" => Ok(text_response(StatusCode::OK, "OK")),
        _ => Ok(text_response(StatusCode::NOT_FOUND, "Not Found")),
    }
}

/// Serve `/metrics` and `/health` on `addr` until `shutdown` fires.
pub async fn start_metrics_server(
    addr: SocketAddr,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "metrics server listening");

    loop {
        let stream = tokio::select! {
            _ = shutdown.cancelled() => {
                info!("metrics server shutting down");
                return Ok(());
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, _)) => stream,
                Err(e) => {
                    error!(error = %e, "failed to accept metrics connection");
                    continue;
                }
            },
        };

        let io = TokioIo::new(stream);
        tokio::spawn(async move {
            if let Err(e) = http1::Builder::new()
                .serve_connection(io, service_fn(handle_request))
                .await
            {
                error!(error = %e, "error serving metrics connection");
            }
        });
    }
}

/// Run the metrics server as a background task.
pub fn spawn_metrics_server(
    addr: SocketAddr,
    shutdown: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = start_metrics_server(addr, shutdown).await {
            error!(error = %e, "metrics server error");
        }
    })
}
