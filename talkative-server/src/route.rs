use crate::config::ServerConfig;
use crate::hub::HubHandle;
use crate::websocket_listener;
use axum::extract::{State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{routing::get, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone)]
pub struct AppState {
    pub hub: HubHandle,
    pub config: Arc<ServerConfig>,
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub port: u16,
    pub message: String,
    pub connected: usize,
    pub waiting: usize,
    pub pairs: usize,
}

/// Body of `GET /`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInfo {
    pub message: String,
    pub status: String,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub health: String,
    pub websocket: String,
}

#[instrument(skip(state))]
pub fn create_relay_route(state: AppState) -> Router {
    debug!("Creating relay routes");
    Router::new()
        .route("/", get(api_info))
        .route("/ws", get(handle_upgrade))
        .route("/health", get(health))
        .with_state(state)
}

async fn handle_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    websocket_listener::handle_websocket(ws, state.hub, state.config.outbound_buffer).await
}

async fn api_info() -> Json<ApiInfo> {
    Json(ApiInfo {
        message: "Talkative Relay API".to_string(),
        status: "running".to_string(),
        endpoints: Endpoints {
            health: "/health".to_string(),
            websocket: "/ws".to_string(),
        },
    })
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let port = state.config.port;

    match state.hub.snapshot().await {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "OK".to_string(),
                timestamp,
                port,
                message: "Server is healthy".to_string(),
                connected: snapshot.connected,
                waiting: snapshot.waiting,
                pairs: snapshot.pairs,
            }),
        ),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "ERROR".to_string(),
                    timestamp,
                    port,
                    message: e.to_string(),
                    connected: 0,
                    waiting: 0,
                    pairs: 0,
                }),
            )
        }
    }
}
