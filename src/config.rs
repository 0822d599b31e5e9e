//! Application configuration loaded from environment variables.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Parameter Store ===
    /// Base URL of the parameter store HTTP endpoint.
    #[serde(default = "default_store_url")]
    pub parameter_store_url: String,

    /// Region passed to the parameter store on every fetch.
    #[serde(default = "default_region")]
    pub parameter_store_region: String,

    /// Name of the flag parameter to poll.
    #[serde(default = "default_flag_parameter")]
    pub flag_parameter: String,

    // === Polling ===
    /// Seconds between parameter store polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,

    // === HTTP Client ===
    /// Request timeout for parameter store calls in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    /// Connection pool size per host.
    #[serde(default = "default_http_pool_size")]
    pub http_pool_size: usize,

    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_store_url() -> String {
    "http://localhost:4566".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_flag_parameter() -> String {
    "fear".to_string()
}

fn default_poll_interval() -> u64 {
    30
}

fn default_http_timeout_ms() -> u64 {
    5000
}

fn default_http_pool_size() -> usize {
    10
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.parameter_store_url.is_empty() {
            return Err("PARAMETER_STORE_URL is required".to_string());
        }

        if !self.parameter_store_url.starts_with("http") {
            return Err("PARAMETER_STORE_URL must be an http(s) URL".to_string());
        }

        if self.flag_parameter.is_empty() {
            return Err("FLAG_PARAMETER must not be empty".to_string());
        }

        if self.poll_interval_seconds == 0 {
            return Err("POLL_INTERVAL_SECONDS must be at least 1".to_string());
        }

        if self.http_timeout_ms == 0 {
            return Err("HTTP_TIMEOUT_MS must be at least 1".to_string());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parameter_store_url: default_store_url(),
            parameter_store_region: default_region(),
            flag_parameter: default_flag_parameter(),
            poll_interval_seconds: default_poll_interval(),
            http_timeout_ms: default_http_timeout_ms(),
            http_pool_size: default_http_pool_size(),
            port: default_port(),
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}
