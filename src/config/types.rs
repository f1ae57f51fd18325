//! Configuration Types

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub drone: DroneConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

/// Drone link configuration
///
/// The defaults are the conventional access-point address of this class of
/// drone; callers may override host and port per connect request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DroneConfig {
    pub default_host: String,
    pub default_port: u16,
    #[serde(with = "humantime_serde")]
    pub send_timeout: Duration,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_addr: "0.0.0.0:8001".parse().unwrap(),
                shutdown_timeout: Duration::from_secs(30),
            },
            drone: DroneConfig {
                default_host: "192.168.4.1".to_string(),
                default_port: 2390,
                send_timeout: Duration::from_secs(2),
            },
            logging: LoggingConfig {
                log_level: "info".to_string(),
            },
        }
    }
}
