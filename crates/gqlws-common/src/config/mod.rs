//! Configuration loading

mod gateway_config;

pub use gateway_config::{ConfigError, GatewayConfig};
