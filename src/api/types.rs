//! HTTP API Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::relay::RelayError;

/// RFC 3339 timestamp for response bodies.
pub fn timestamp() -> String {
    humantime::format_rfc3339_seconds(SystemTime::now()).to_string()
}

/// Service information returned by the root health endpoint
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: String,
}

/// Connect request body; omitted fields fall back to the configured defaults
#[derive(Debug, Default, Deserialize)]
pub struct ConnectRequest {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

/// Connect response
#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub connected: bool,
    pub host: String,
    pub port: u16,
    pub timestamp: String,
}

/// Send request body carrying a base64-encoded command packet
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub data: String,
}

/// Send response
#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub sent: bool,
    pub bytes: usize,
    pub timestamp: String,
}

/// Disconnect response
#[derive(Debug, Serialize)]
pub struct DisconnectResponse {
    pub disconnected: bool,
    pub timestamp: String,
}

/// Status response; host and port are present only while connected
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    pub timestamp: String,
}

/// Error body returned for failed relay operations
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
    pub timestamp: String,
}

/// Relay error adapted to an HTTP response.
///
/// Each error class maps to its own status code so callers can tell
/// precondition, payload, and transport failures apart.
#[derive(Debug)]
pub struct ApiError(pub RelayError);

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RelayError::NotConnected => StatusCode::CONFLICT,
            RelayError::Payload(_) => StatusCode::BAD_REQUEST,
            RelayError::Acquire { .. }
            | RelayError::NoAddress { .. }
            | RelayError::Send { .. } => StatusCode::BAD_GATEWAY,
            RelayError::SendTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        };

        let body = ErrorResponse {
            error: self.0.to_string(),
            kind: self.0.kind().to_string(),
            timestamp: timestamp(),
        };

        (status, Json(body)).into_response()
    }
}
