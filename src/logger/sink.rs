//! Request log sinks
//!
//! Handlers report each finished request through a [`RequestLog`] held by the
//! application state, so the destination can be swapped (and inspected in tests).

use super::format::RequestLogEntry;

/// Destination for per-request log entries
pub trait RequestLog: Send + Sync {
    fn record(&self, entry: &RequestLogEntry);
}

/// Writes entries to the access log target in the configured format
pub struct ConsoleRequestLog {
    format: String,
}

impl ConsoleRequestLog {
    pub const fn new(format: String) -> Self {
        Self { format }
    }
}

impl RequestLog for ConsoleRequestLog {
    fn record(&self, entry: &RequestLogEntry) {
        super::write_access(&entry.format(&self.format));
    }
}

/// Drops every entry (access log disabled)
pub struct NoopRequestLog;

impl RequestLog for NoopRequestLog {
    fn record(&self, _entry: &RequestLogEntry) {}
}
