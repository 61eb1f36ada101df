//! Gateway configuration
//!
//! Loads configuration from environment variables.

use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Gateway server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// How long a connection may stay uninitialised before it is closed
    /// with an init-timeout status
    #[serde(default = "default_init_timeout_secs")]
    pub connection_init_timeout_secs: u64,

    /// Keep-alive ping interval; `None` disables keep-alive
    #[serde(default)]
    pub keep_alive_interval_secs: Option<u64>,

    /// Upper bound on the connection-init hook during the handshake
    #[serde(default = "default_init_handler_timeout_secs")]
    pub init_handler_timeout_secs: u64,

    /// Capacity of the per-session outbound write queue
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
}

impl GatewayConfig {
    /// Load configuration from environment variables
    ///
    /// A `.env` file is honored when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            host: env::var("GATEWAY_HOST").unwrap_or_else(|_| default_host()),
            port: match env::var("GATEWAY_PORT") {
                Ok(s) => s
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("GATEWAY_PORT", s))?,
                Err(_) => default_port(),
            },
            connection_init_timeout_secs: parse_var(
                "CONNECTION_INIT_TIMEOUT_SECS",
                default_init_timeout_secs(),
            )?,
            keep_alive_interval_secs: match env::var("KEEP_ALIVE_INTERVAL_SECS") {
                Ok(s) => {
                    let secs: u64 = s
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("KEEP_ALIVE_INTERVAL_SECS", s))?;
                    // 0 disables keep-alive
                    (secs > 0).then_some(secs)
                }
                Err(_) => None,
            },
            init_handler_timeout_secs: parse_var(
                "INIT_HANDLER_TIMEOUT_SECS",
                default_init_handler_timeout_secs(),
            )?,
            outbound_buffer: parse_var("OUTBOUND_BUFFER_SIZE", default_outbound_buffer())?,
        })
    }

    /// Get the bind address as a string
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the connection-init timeout as a `Duration`
    #[must_use]
    pub fn connection_init_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_init_timeout_secs)
    }

    /// Get the keep-alive interval as a `Duration`, if enabled
    #[must_use]
    pub fn keep_alive_interval(&self) -> Option<Duration> {
        self.keep_alive_interval_secs.map(Duration::from_secs)
    }

    /// Get the init-handler timeout as a `Duration`
    #[must_use]
    pub fn init_handler_timeout(&self) -> Duration {
        Duration::from_secs(self.init_handler_timeout_secs)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            connection_init_timeout_secs: default_init_timeout_secs(),
            keep_alive_interval_secs: None,
            init_handler_timeout_secs: default_init_handler_timeout_secs(),
            outbound_buffer: default_outbound_buffer(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(s) => s.parse().map_err(|_| ConfigError::InvalidValue(name, s)),
        Err(_) => Ok(default),
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_init_timeout_secs() -> u64 {
    60
}

fn default_init_handler_timeout_secs() -> u64 {
    10
}

fn default_outbound_buffer() -> usize {
    100
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
