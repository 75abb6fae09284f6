// Application state module
// Immutable state shared by every connection

use std::sync::Arc;

use super::types::Config;
use crate::logger::{self, RequestLog};
use crate::routing::{self, Route};

/// Application state
pub struct AppState {
    pub config: Config,
    /// Ordered route table, wildcard last
    pub routes: Vec<Route>,
    /// Where handlers report finished requests
    pub request_log: Arc<dyn RequestLog>,
}

impl AppState {
    /// Create `AppState` with the request log sink described by the config
    pub fn new(config: &Config) -> Self {
        Self::with_request_log(config, logger::request_log(config))
    }

    /// Create `AppState` with an explicit request log sink
    pub fn with_request_log(config: &Config, request_log: Arc<dyn RequestLog>) -> Self {
        Self {
            config: config.clone(),
            routes: routing::default_routes(),
            request_log,
        }
    }
}
