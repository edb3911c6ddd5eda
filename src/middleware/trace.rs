//! Per-request tracing span with method, path, status and latency.

use std::time::Instant;

use tracing::Instrument;

use crate::middleware::Next;
use crate::request::Request;
use crate::response::Response;

/// Wraps the rest of the chain in an `HTTP request` span and emits one event
/// when the response is ready.
///
/// Register it first so that every other middleware runs inside the span:
///
/// ```rust,no_run
/// use chirp::{Router, middleware};
///
/// let app = Router::new().layer(middleware::trace::trace);
/// ```
pub async fn trace(req: Request, next: Next) -> Response {
    let span = tracing::info_span!(
        "HTTP request",
        http.request.method = %req.method(),
        url.path = %req.path(),
        http.response.status_code = tracing::field::Empty,
    );
    let started = Instant::now();

    let response = next.run(req).instrument(span.clone()).await;

    let status = response.status_code();
    span.record("http.response.status_code", status);
    let latency_ms = started.elapsed().as_millis() as u64;
    span.in_scope(|| {
        if status >= 500 {
            tracing::error!(status, latency_ms, "request failed");
        } else {
            tracing::info!(status, latency_ms, "request completed");
        }
    });
    response
}
