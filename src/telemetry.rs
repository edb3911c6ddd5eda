//! Logging setup and tracing helpers.

use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

/// Installs a global `fmt` subscriber. Verbosity comes from `RUST_LOG`,
/// falling back to `default_filter` (e.g. `"info"`).
///
/// Calling it twice is harmless: the second subscriber is simply not installed.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

/// Like [`tokio::task::spawn_blocking`], but the closure runs inside the
/// caller's current span.
pub fn spawn_blocking_with_tracing<F, R>(f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let current_span = tracing::Span::current();
    tokio::task::spawn_blocking(move || current_span.in_scope(f))
}
