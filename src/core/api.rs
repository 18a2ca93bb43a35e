//! HTTP + WebSocket status API for overlays
//!
//! Endpoints:
//! - GET /health - Health check
//! - GET /status - Latest controller status (tilt label, active, held)
//! - WS /ws - Live status after every frame
//!
//! Read-only: the frame loop publishes, the server never touches engine state.

use axum::{
    extract::{State, WebSocketUpgrade, ws::{Message, WebSocket}},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

use crate::types::ControllerStatus;

/// Shared between the frame loop (writer) and the HTTP handlers (readers)
pub struct AppState {
    pub status: RwLock<ControllerStatus>,
    pub update_tx: broadcast::Sender<ControllerStatus>,
}

impl AppState {
    pub fn new() -> Arc<Self> {
        let (update_tx, _) = broadcast::channel(100);
        Arc::new(Self {
            status: RwLock::new(ControllerStatus::default()),
            update_tx,
        })
    }

    /// Publish from async code
    pub async fn publish(&self, status: ControllerStatus) {
        *self.status.write().await = status.clone();
        // No subscribers is fine
        let _ = self.update_tx.send(status);
    }

    /// Publish from the blocking frame loop
    pub fn publish_blocking(&self, status: ControllerStatus) {
        *self.status.blocking_write() = status.clone();
        let _ = self.update_tx.send(status);
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub frames: u64,
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(get_status))
        .route("/ws", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let status = state.status.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        frames: status.frames,
    })
}

/// Latest published status
async fn get_status(State(state): State<Arc<AppState>>) -> Json<ControllerStatus> {
    Json(state.status.read().await.clone())
}

/// WebSocket handler for live updates
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let rx = state.update_tx.subscribe();
    ws.on_upgrade(move |socket| handle_websocket(socket, rx))
}

/// Forward status updates until either side goes away
async fn handle_websocket(socket: WebSocket, mut rx: broadcast::Receiver<ControllerStatus>) {
    let (mut sender, mut receiver) = socket.split();
    debug!("overlay connected");

    loop {
        tokio::select! {
            update = rx.recv() => {
                let update = match update {
                    Ok(update) => update,
                    // Slow client: skip ahead to the newest status
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                let json = serde_json::to_string(&update).unwrap_or_default();
                if sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }
    debug!("overlay disconnected");
}

/// Run the API server
pub async fn run_server(addr: &str, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "status API listening");
    info!("  GET /health - Health check");
    info!("  GET /status - Current status");
    info!("  WS  /ws     - Live updates");
    axum::serve(listener, router).await?;
    Ok(())
}
