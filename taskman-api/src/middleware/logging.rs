/// Request logging hooks for `tower_http::trace::TraceLayer`
///
/// Every request gets an `http_request` span carrying method, path and client
/// ip. A single event with status and latency is emitted when the response is
/// ready. Headers and bodies are never recorded, so cookies and tokens stay
/// out of the logs.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request};
use axum::response::Response;
use tracing::Span;

/// Builds the span for one request
///
/// The client ip is only known when the server was started with
/// `into_make_service_with_connect_info`; otherwise it is logged as `-`.
pub fn make_span(request: &Request) -> Span {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string());

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        ip = %ip,
    )
}

/// Logs status and latency once the response is produced
pub fn on_response(response: &Response, latency: Duration, _span: &Span) {
    let status = response.status().as_u16();
    let latency_ms = latency.as_secs_f64() * 1000.0;

    if response.status().is_server_error() {
        tracing::error!(status, latency_ms, "request failed");
    } else {
        tracing::info!(status, latency_ms, "request completed");
    }
}
