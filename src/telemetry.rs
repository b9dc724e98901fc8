use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, Response},
};
use tracing::Span;
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingConfig, DEFAULT_LOG_FILTER};

/// Installs the global subscriber. An unparsable filter falls back to the
/// default one instead of silencing everything.
pub fn init(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.filter).unwrap_or_else(|e| {
        eprintln!("ignoring log filter {:?}: {}", logging.filter, e);
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json {
        builder.with_target(false).json().init();
    } else {
        builder.compact().init();
    }
}

/// One span per request, keyed by path. Query strings are not recorded.
pub fn request_span(req: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %req.method(),
        path = req.uri().path(),
        status = tracing::field::Empty,
        latency_ms = tracing::field::Empty,
    )
}

pub fn record_response(res: &Response<Body>, latency: Duration, span: &Span) {
    let status = res.status();
    let latency_ms = latency.as_millis() as u64;
    span.record("status", status.as_u16());
    span.record("latency_ms", latency_ms);
    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), latency_ms, "request failed");
    } else if status.is_client_error() {
        tracing::warn!(status = status.as_u16(), latency_ms, "request rejected");
    } else {
        tracing::info!(status = status.as_u16(), latency_ms, "request served");
    }
}
