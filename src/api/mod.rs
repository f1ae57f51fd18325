//! HTTP API Module
//!
//! REST surface the control app talks to: connect, send, disconnect, status.

pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use routes::RelayApi;
pub use server::ApiServer;
pub use types::*;
