//! Relay Session
//!
//! The single stateful entity of the service: one optional outbound UDP link
//! to the drone, guarded by a lock so concurrent API requests never observe a
//! target without a transport or vice versa.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use tokio::net::{lookup_host, UdpSocket};
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::RelayError;

/// An established outbound association: the recorded target and the socket
/// used to reach it. Keeping both in one value makes them transition together.
struct Link {
    target: SocketAddr,
    socket: UdpSocket,
}

/// Snapshot of the session state, as reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkStatus {
    pub connected: bool,
    pub target: Option<SocketAddr>,
}

/// Session-scoped UDP relay.
///
/// Exactly one instance exists per running service; all requests act on it.
/// Connect, send, and disconnect serialize on the write lock; status takes
/// the read lock. The write lock is held across the bounded send so the
/// socket cannot be closed out from under an in-flight datagram.
pub struct RelaySession {
    link: RwLock<Option<Link>>,
    send_timeout: Duration,
}

impl RelaySession {
    /// Create a disconnected session with the given send timeout.
    pub fn new(send_timeout: Duration) -> Self {
        Self {
            link: RwLock::new(None),
            send_timeout,
        }
    }

    /// Create a session from service configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.drone.send_timeout)
    }

    /// Establish the outbound link to `host:port`, replacing any existing one.
    ///
    /// The old link is released before the new transport is acquired, so at
    /// most one outbound socket ever exists. If acquisition fails the session
    /// is left disconnected and the error is returned to the caller.
    pub async fn connect(&self, host: &str, port: u16) -> Result<SocketAddr, RelayError> {
        let mut link = self.link.write().await;

        if let Some(old) = link.take() {
            debug!("Releasing existing link to {}", old.target);
        }

        let target = resolve_target(host, port).await?;
        let socket = bind_for(target, host, port).await?;

        info!("Connected to drone at {}", target);
        *link = Some(Link { target, socket });

        Ok(target)
    }

    /// Decode a base64 payload and forward the raw bytes to the drone.
    ///
    /// Fails with `NotConnected` before decoding if no link is active, and
    /// with a payload error before any network call if the input is
    /// malformed. Returns the number of bytes handed to the transport.
    /// Transport failures are surfaced to the caller and do not tear down
    /// the link; retrying is the caller's decision.
    pub async fn send(&self, encoded: &str) -> Result<usize, RelayError> {
        let link = self.link.write().await;
        let link = link.as_ref().ok_or(RelayError::NotConnected)?;

        let packet = general_purpose::STANDARD.decode(encoded)?;
        debug!("Forwarding {} byte packet to {}", packet.len(), link.target);

        match timeout(self.send_timeout, link.socket.send_to(&packet, link.target)).await {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(source)) => {
                warn!("Send to {} failed: {}", link.target, source);
                Err(RelayError::Send {
                    target: link.target,
                    source,
                })
            }
            Err(_) => {
                warn!(
                    "Send to {} timed out after {:?}",
                    link.target, self.send_timeout
                );
                Err(RelayError::SendTimeout {
                    target: link.target,
                    timeout: self.send_timeout,
                })
            }
        }
    }

    /// Release the link if one is active. Idempotent; never fails.
    pub async fn disconnect(&self) {
        let mut link = self.link.write().await;
        match link.take() {
            Some(old) => info!("Disconnected from drone at {}", old.target),
            None => debug!("Disconnect requested with no active link"),
        }
    }

    /// Report whether a link is active and, if so, its target.
    pub async fn status(&self) -> LinkStatus {
        let link = self.link.read().await;
        LinkStatus {
            connected: link.is_some(),
            target: link.as_ref().map(|l| l.target),
        }
    }
}

/// Resolve `host:port` to the first usable socket address.
async fn resolve_target(host: &str, port: u16) -> Result<SocketAddr, RelayError> {
    let mut addrs = lookup_host((host, port))
        .await
        .map_err(|source| RelayError::Acquire {
            target: format!("{}:{}", host, port),
            source,
        })?;

    addrs.next().ok_or_else(|| RelayError::NoAddress {
        host: host.to_string(),
        port,
    })
}

/// Bind an ephemeral outbound socket matching the target's address family.
async fn bind_for(target: SocketAddr, host: &str, port: u16) -> Result<UdpSocket, RelayError> {
    let bind_addr: SocketAddr = match target {
        SocketAddr::V4(_) => (IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0).into(),
        SocketAddr::V6(_) => (IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0).into(),
    };

    UdpSocket::bind(bind_addr)
        .await
        .map_err(|source| RelayError::Acquire {
            target: format!("{}:{}", host, port),
            source,
        })
}
