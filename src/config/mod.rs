// Configuration module entry point
// Manages application configuration and shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, FixtureConfig, LoggingConfig, PerformanceConfig, ServerConfig};

/// Default config file name (without extension), looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "mock_server";

impl Config {
    /// Load configuration from the default file, environment and built-in defaults
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional. `MOCK_*` environment variables override it,
    /// with `__` separating nested keys (`MOCK_SERVER__PORT=5555`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("MOCK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 4444)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "console")?
            .set_default("fixtures.contact_delay_ms", 2000)?
            .set_default("fixtures.contacts_delay_ms", 1000)?
            .set_default("performance.keep_alive", true)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 4444,
                workers: None,
            },
            logging: LoggingConfig {
                access_log: true,
                access_log_format: "console".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
            fixtures: FixtureConfig::default(),
            performance: PerformanceConfig { keep_alive: true },
        }
    }
}
