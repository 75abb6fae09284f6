//! Logger module
//!
//! Provides logging utilities for the mock server including:
//! - Startup banner
//! - Per-request log lines through an injectable sink
//! - Error and warning logging
//! - File-based logging support

mod format;
mod sink;
pub mod writer;

pub use format::RequestLogEntry;
pub use sink::{ConsoleRequestLog, NoopRequestLog, RequestLog};

#[cfg(test)]
pub use sink::testing::RecordingRequestLog;

use crate::config::Config;
use std::net::SocketAddr;
use std::sync::Arc;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Build the request log sink described by the configuration
pub fn request_log(config: &Config) -> Arc<dyn RequestLog> {
    if config.logging.access_log {
        Arc::new(ConsoleRequestLog::new(
            config.logging.access_log_format.clone(),
        ))
    } else {
        Arc::new(NoopRequestLog)
    }
}

/// Write to info/access log
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Print the startup banner with the available endpoints
pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    let base = format!("http://localhost:{}", addr.port());
    write_access("");
    write_access(&format!("  Mock HTTP Server running on {base} (bound {addr})"));
    write_access("");
    write_access("  Endpoints:");
    write_access(&format!(
        "    GET  {base}/contact            — 1 contact (object), default delay {}ms",
        config.fixtures.contact_delay_ms
    ));
    write_access(&format!(
        "    GET  {base}/contacts           — 3 contacts (array), default delay {}ms",
        config.fixtures.contacts_delay_ms
    ));
    write_access(&format!(
        "    GET  {base}/contact?delay=5000 — with custom delay"
    ));
    write_access("");
    write_access("  Generic:");
    write_access("    Any method, any path — echoes request back");
    write_access("    ?delay=2000     — response delay (ms)");
    write_access("    ?status=500     — response status");
    write_access("    ?body={\"ok\":1}  — response body (JSON, or wrapped as {\"message\": ...})");
    if let Some(workers) = config.server.workers {
        write_access(&format!("  Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_access(&format!("  Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_access(&format!("  Error log: {path}"));
    }
    write_access("");
}

pub fn log_shutdown(reason: &str) {
    write_access(&format!("\n  {reason}, shutting down"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}
