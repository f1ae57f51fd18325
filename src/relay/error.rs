//! Relay Error Taxonomy

use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// Errors produced by relay operations.
///
/// Precondition and payload errors are caller bugs and never touch the
/// network; transport errors carry enough detail for the caller to decide
/// whether to re-issue the operation. The relay itself never retries.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Send was attempted without an active drone link.
    #[error("not connected to a drone")]
    NotConnected,
    /// The payload could not be decoded from its base64 transport encoding.
    #[error("payload is not valid base64: {0}")]
    Payload(#[from] base64::DecodeError),
    /// Resolving the target or binding the outbound socket failed.
    #[error("failed to acquire transport for {target}: {source}")]
    Acquire {
        target: String,
        source: std::io::Error,
    },
    /// The target resolved to no usable address.
    #[error("no usable address for {host}:{port}")]
    NoAddress { host: String, port: u16 },
    /// The transport-level send failed.
    #[error("send to {target} failed: {source}")]
    Send {
        target: SocketAddr,
        source: std::io::Error,
    },
    /// The send did not complete within the configured bound.
    #[error("send to {target} timed out after {timeout:?}")]
    SendTimeout {
        target: SocketAddr,
        timeout: Duration,
    },
}

impl RelayError {
    /// Stable machine-readable classification, used by the API layer.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::NotConnected => "precondition",
            RelayError::Payload(_) => "payload_format",
            RelayError::Acquire { .. } | RelayError::NoAddress { .. } => "transport_acquisition",
            RelayError::Send { .. } => "transport_send",
            RelayError::SendTimeout { .. } => "transport_timeout",
        }
    }
}
