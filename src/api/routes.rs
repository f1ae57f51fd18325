//! HTTP API Routes

use super::handlers::*;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

/// Relay API router
pub struct RelayApi;

impl RelayApi {
    /// Create the API router
    pub fn create_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(service_info))
            .route("/api", get(service_info))
            .route("/api/drone/connect", post(connect_drone))
            .route("/api/drone/send", post(send_packet))
            .route("/api/drone/disconnect", post(disconnect_drone))
            .route("/api/drone/status", get(drone_status))
            .with_state(state)
            .layer(CorsLayer::permissive())
    }
}
