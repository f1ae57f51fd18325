//! HTTP API Handlers

use super::types::*;
use crate::config::Config;
use crate::relay::RelaySession;
use axum::{extract::State, Json};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::RwLock;
use tracing::info;

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelaySession>,
    pub config: Arc<RwLock<Config>>,
    pub start_time: SystemTime,
}

impl AppState {
    /// Create handler state around the process-wide relay session
    pub fn new(relay: Arc<RelaySession>, config: Arc<RwLock<Config>>) -> Self {
        Self {
            relay,
            config,
            start_time: SystemTime::now(),
        }
    }
}

/// Service info / health check handler
pub async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    let uptime = SystemTime::now()
        .duration_since(state.start_time)
        .unwrap_or_default()
        .as_secs();

    Json(ServiceInfo {
        status: "online".to_string(),
        service: "Skyrelay Drone Command Relay".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        timestamp: timestamp(),
    })
}

/// Establish the UDP link to the drone
pub async fn connect_drone(
    State(state): State<AppState>,
    request: Option<Json<ConnectRequest>>,
) -> Result<Json<ConnectResponse>, ApiError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();

    let (host, port) = {
        let config = state.config.read().await;
        (
            request
                .host
                .unwrap_or_else(|| config.drone.default_host.clone()),
            request.port.unwrap_or(config.drone.default_port),
        )
    };

    state.relay.connect(&host, port).await?;

    Ok(Json(ConnectResponse {
        connected: true,
        host,
        port,
        timestamp: timestamp(),
    }))
}

/// Forward one command packet to the drone
pub async fn send_packet(
    State(state): State<AppState>,
    Json(request): Json<SendRequest>,
) -> Result<Json<SendResponse>, ApiError> {
    let bytes = state.relay.send(&request.data).await?;

    Ok(Json(SendResponse {
        sent: true,
        bytes,
        timestamp: timestamp(),
    }))
}

/// Release the UDP link; succeeds whether or not one was active
pub async fn disconnect_drone(State(state): State<AppState>) -> Json<DisconnectResponse> {
    state.relay.disconnect().await;
    info!("Disconnect requested via API");

    Json(DisconnectResponse {
        disconnected: true,
        timestamp: timestamp(),
    })
}

/// Report the current link state
pub async fn drone_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let status = state.relay.status().await;

    Json(StatusResponse {
        connected: status.connected,
        host: status.target.map(|t| t.ip().to_string()),
        port: status.target.map(|t| t.port()),
        timestamp: timestamp(),
    })
}
