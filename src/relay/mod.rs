//! UDP Relay Module
//!
//! Owns the single outbound UDP association to the drone and forwards
//! client-supplied command packets to it.

pub mod error;
pub mod session;

pub use error::RelayError;
pub use session::{LinkStatus, RelaySession};
