//! Graceful Shutdown Handling
//!
//! Waits for SIGTERM and SIGINT so the relay link can be released cleanly
//! before the process exits.

use crate::Result;
use tokio::signal;
use tracing::info;

/// Block until a shutdown signal (SIGTERM, SIGINT) arrives.
pub async fn wait_for_signal() -> Result<()> {
    info!("Starting shutdown signal listener");

    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM, initiating graceful shutdown");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, initiating graceful shutdown");
            }
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, initiating graceful shutdown");
            }
        }
    }

    #[cfg(windows)]
    {
        signal::ctrl_c().await?;
        info!("Received Ctrl+C, initiating graceful shutdown");
    }

    Ok(())
}
