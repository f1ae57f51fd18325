//! Configuration Manager

use super::Config;
use crate::Result;
use anyhow::{bail, Context};
use std::net::SocketAddr;
use std::path::Path;

/// Manages configuration loading and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> Result<Config> {
        if path.exists() {
            tracing::info!("Loading configuration from: {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

            config
                .validate()
                .with_context(|| "Configuration validation failed")?;

            tracing::info!("Configuration loaded and validated successfully");
            Ok(config)
        } else {
            tracing::warn!(
                "Configuration file not found at {}, using defaults",
                path.display()
            );
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env() -> Result<Config> {
        let mut config = Config::default();

        if let Ok(bind_addr) = std::env::var("SKYRELAY_BIND_ADDR") {
            config.server.bind_addr = bind_addr
                .parse::<SocketAddr>()
                .with_context(|| format!("Invalid SKYRELAY_BIND_ADDR: {}", bind_addr))?;
        }

        if let Ok(host) = std::env::var("SKYRELAY_DRONE_HOST") {
            config.drone.default_host = host;
        }

        if let Ok(port) = std::env::var("SKYRELAY_DRONE_PORT") {
            config.drone.default_port = port
                .parse::<u16>()
                .with_context(|| format!("Invalid SKYRELAY_DRONE_PORT: {}", port))?;
        }

        if let Ok(timeout) = std::env::var("SKYRELAY_SEND_TIMEOUT") {
            config.drone.send_timeout = humantime::parse_duration(&timeout)
                .with_context(|| format!("Invalid SKYRELAY_SEND_TIMEOUT: {}", timeout))?;
        }

        if let Ok(log_level) = std::env::var("SKYRELAY_LOG_LEVEL") {
            config.logging.log_level = log_level;
        }

        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.validate_drone_config()
            .with_context(|| "Drone configuration validation failed")?;

        self.validate_logging_config()
            .with_context(|| "Logging configuration validation failed")?;

        if self.server.shutdown_timeout.as_secs() == 0 {
            bail!("shutdown_timeout must be greater than 0");
        }

        Ok(())
    }

    /// Validate drone link configuration
    fn validate_drone_config(&self) -> Result<()> {
        if self.drone.default_host.is_empty() {
            bail!("drone.default_host must not be empty");
        }

        if self.drone.default_port == 0 {
            bail!("drone.default_port must be greater than 0");
        }

        if self.drone.send_timeout.is_zero() {
            bail!("drone.send_timeout must be greater than 0");
        }

        if self.drone.send_timeout.as_secs() > 60 {
            bail!("drone.send_timeout cannot exceed 1 minute");
        }

        Ok(())
    }

    /// Validate logging configuration
    fn validate_logging_config(&self) -> Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.logging.log_level.as_str()) {
            bail!(
                "logging.log_level must be one of: {}",
                valid_log_levels.join(", ")
            );
        }

        Ok(())
    }

    /// Merge with CLI arguments
    pub fn merge_with_cli_args(
        &mut self,
        bind: Option<&str>,
        port: Option<u16>,
        send_timeout: Option<u64>,
    ) {
        if let Some(bind_str) = bind {
            if let Ok(addr) = bind_str.parse::<SocketAddr>() {
                self.server.bind_addr = addr;
                tracing::info!("CLI override: bind address set to {}", addr);
            } else {
                tracing::warn!("Invalid bind address provided: {}", bind_str);
            }
        }

        if let Some(port) = port {
            self.server.bind_addr.set_port(port);
            tracing::info!("CLI override: port set to {}", port);
        }

        if let Some(timeout_secs) = send_timeout {
            self.drone.send_timeout = std::time::Duration::from_secs(timeout_secs);
            tracing::info!("CLI override: send timeout set to {}s", timeout_secs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.drone.default_host, "192.168.4.1");
        assert_eq!(config.drone.default_port, 2390);
        assert_eq!(config.drone.send_timeout, Duration::from_secs(2));
    }

    #[test]
    fn rejects_zero_send_timeout() {
        let mut config = Config::default();
        config.drone.send_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_invalid_log_level() {
        let mut config = Config::default();
        config.logging.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_config_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[server]
bind_addr = "127.0.0.1:9001"
shutdown_timeout = "10s"

[drone]
default_host = "10.0.0.5"
default_port = 4000
send_timeout = "500ms"

[logging]
log_level = "debug"
"#
        )
        .unwrap();

        let config = ConfigManager::load_from_file(file.path()).unwrap();
        assert_eq!(config.server.bind_addr, "127.0.0.1:9001".parse().unwrap());
        assert_eq!(config.drone.default_host, "10.0.0.5");
        assert_eq!(config.drone.default_port, 4000);
        assert_eq!(config.drone.send_timeout, Duration::from_millis(500));
        assert_eq!(config.logging.log_level, "debug");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ConfigManager::load_from_file(Path::new("/does/not/exist.toml")).unwrap();
        assert_eq!(config.drone.default_port, 2390);
    }

    #[test]
    fn cli_overrides_take_effect() {
        let mut config = Config::default();
        config.merge_with_cli_args(Some("127.0.0.1:7000"), Some(7100), Some(5));
        assert_eq!(config.server.bind_addr.port(), 7100);
        assert_eq!(config.drone.send_timeout, Duration::from_secs(5));
    }
}
