//! Skyrelay - UDP Command Relay for Wi-Fi Controlled Drones
//!
//! Forwards base64-encoded command packets from a phone or tablet control
//! app to a drone over UDP, since mobile platforms cannot reliably open raw
//! UDP sockets to a local-only access point.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skyrelay::{
    api::{handlers::AppState, ApiServer},
    config::ConfigManager,
    shutdown, RelaySession,
};

/// CLI arguments for Skyrelay
#[derive(Parser, Debug)]
#[command(name = "skyrelay")]
#[command(about = "Skyrelay - UDP command relay for Wi-Fi controlled drones")]
#[command(version)]
#[command(long_about = "
Skyrelay - UDP command relay for Wi-Fi controlled drones

Accepts base64-encoded command packets over HTTP and forwards the raw bytes
to the drone over UDP.

Configuration priority (highest to lowest):
1. Command-line arguments
2. Configuration file
3. Environment variables
4. Built-in defaults

Environment variables:
  SKYRELAY_BIND_ADDR    - Bind address (e.g., 0.0.0.0:8001)
  SKYRELAY_DRONE_HOST   - Default drone host (e.g., 192.168.4.1)
  SKYRELAY_DRONE_PORT   - Default drone port (e.g., 2390)
  SKYRELAY_SEND_TIMEOUT - UDP send timeout (e.g., 2s, 500ms)
  SKYRELAY_LOG_LEVEL    - Log level (trace, debug, info, warn, error)
")]
pub struct CliArgs {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "config.toml",
        help = "Path to configuration file"
    )]
    pub config: PathBuf,

    /// Bind address (overrides config file)
    #[arg(short, long, help = "Bind address (e.g., 0.0.0.0:8001)")]
    pub bind: Option<String>,

    /// Port to bind to (overrides config file)
    #[arg(short, long, help = "Port to bind to")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", help = "Log level")]
    pub log_level: String,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// UDP send timeout in seconds
    #[arg(long, help = "UDP send timeout in seconds")]
    pub send_timeout: Option<u64>,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration and exit")]
    pub validate_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Initialize tracing
    init_tracing(&args)?;

    info!("Starting Skyrelay v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration with priority: CLI args > config file > environment > defaults
    let mut config = if args.config.exists() {
        ConfigManager::load_from_file(&args.config)?
    } else {
        info!("Config file not found, checking environment variables");
        ConfigManager::load_from_env()?
    };

    // Apply CLI argument overrides (highest priority)
    config.merge_with_cli_args(args.bind.as_deref(), args.port, args.send_timeout);

    // Final validation after all overrides
    config
        .validate()
        .context("Final configuration validation failed")?;

    // If validate-config flag is set, just validate and exit
    if args.validate_config {
        info!("Configuration is valid");
        info!("Configuration summary:");
        info!("  Bind address: {}", config.server.bind_addr);
        info!(
            "  Default drone target: {}:{}",
            config.drone.default_host, config.drone.default_port
        );
        info!("  Send timeout: {:?}", config.drone.send_timeout);
        info!("  Shutdown timeout: {:?}", config.server.shutdown_timeout);
        return Ok(());
    }

    info!("Configuration loaded successfully");
    info!("Bind address: {}", config.server.bind_addr);
    info!(
        "Default drone target: {}:{}",
        config.drone.default_host, config.drone.default_port
    );

    let shutdown_timeout = config.server.shutdown_timeout;

    // The one relay session for the whole process, injected into the API layer
    let relay = Arc::new(RelaySession::from_config(&config));

    let bind_addr = config.server.bind_addr;
    let config_arc = Arc::new(tokio::sync::RwLock::new(config));
    let app_state = AppState::new(relay.clone(), config_arc);

    // Start the API server
    let server = ApiServer::new(bind_addr, app_state);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.start().await {
            error!("API server error: {}", e);
        }
    });

    info!("Skyrelay started successfully");
    info!("Press Ctrl+C or send SIGTERM/SIGINT to shutdown gracefully");

    // Block until a shutdown signal arrives
    if let Err(e) = shutdown::wait_for_signal().await {
        error!("Error setting up signal handlers: {}", e);
    }

    info!("Initiating graceful shutdown...");

    // Release the drone link before tearing down the server. An in-flight
    // send holds the session lock, so bound the wait for it.
    if tokio::time::timeout(shutdown_timeout, relay.disconnect())
        .await
        .is_err()
    {
        warn!("Shutdown timeout reached before the drone link was released");
    }

    server_handle.abort();
    if let Err(e) = server_handle.await {
        if !e.is_cancelled() {
            error!("API server task failed: {}", e);
        }
    }

    info!("Server shutdown complete");

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(args: &CliArgs) -> Result<()> {
    let log_level = if args.verbose {
        "debug"
    } else {
        &args.log_level
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true),
        )
        .with(env_filter)
        .init();

    Ok(())
}
