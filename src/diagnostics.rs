// Diagnostics sink for cache decisions.
// Injected into the cache gate so tests can observe what it reports.

/// Best-effort text log. Implementations must never fail.
pub trait Diagnostics {
    fn log(&self, message: &str);
}

/// Forwards messages to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn log(&self, message: &str) {
        tracing::debug!(target: "activity_feed::cache", "{}", message);
    }
}

/// Discards everything.
impl Diagnostics for () {
    fn log(&self, _message: &str) {}
}
