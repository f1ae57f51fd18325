//! Skyrelay Library
//!
//! UDP command relay for Wi-Fi controlled drones.
//!
//! Phone and tablet control apps cannot reliably open raw UDP sockets to a
//! local-only access point, so they POST base64-encoded command packets to
//! this service, which forwards the raw bytes to the drone over UDP.

pub mod api;
pub mod config;
pub mod relay;
pub mod shutdown;

pub use config::Config;
pub use relay::RelaySession;

/// Common error type for the relay service
pub type Result<T> = anyhow::Result<T>;
