//! Request log format module
//!
//! Supports two formats:
//! - `console` (human readable, one short line per request)
//! - `json` (one JSON object per line)

use chrono::{DateTime, Local};

/// Request log entry: what was asked for and what was answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLogEntry {
    /// Time the response was produced
    pub time: DateTime<Local>,
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Raw request URL (path plus query string)
    pub url: String,
    /// Effective artificial delay in milliseconds
    pub delay_ms: u64,
    /// Response status code
    pub status: u16,
}

impl RequestLogEntry {
    /// Create a new entry stamped with the current local time
    pub fn new(method: &str, url: &str, delay_ms: u64, status: u16) -> Self {
        Self {
            time: Local::now(),
            method: method.to_string(),
            url: url.to_string(),
            delay_ms,
            status,
        }
    }

    /// Format the entry according to the configured format name
    ///
    /// Unknown names fall back to `console`.
    pub fn format(&self, format: &str) -> String {
        match format {
            "json" => self.format_json(),
            _ => self.format_console(),
        }
    }

    /// `  14:03:05  GET /contact (delay 2000ms) → 200`
    fn format_console(&self) -> String {
        let delay = if self.delay_ms > 0 {
            format!(" (delay {}ms)", self.delay_ms)
        } else {
            String::new()
        };
        format!(
            "  {}  {} {}{} → {}",
            self.time.format("%H:%M:%S"),
            self.method,
            self.url,
            delay,
            self.status,
        )
    }

    fn format_json(&self) -> String {
        serde_json::json!({
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "url": self.url,
            "delay_ms": self.delay_ms,
            "status": self.status,
        })
        .to_string()
    }
}
