//! Axum WebSocket upgrade handlers.

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;

use super::connection::run_connection;
use crate::app_state::AppState;

/// `GET /ws` — Upgrade HTTP connection to WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let relay = Arc::clone(&state.relay_service);
    ws.on_upgrade(move |socket| run_connection(socket, relay))
}

/// `GET /` — WebSocket upgrade when requested, static index otherwise.
///
/// The public WebSocket address has no path, so the channel must be
/// reachable at the root alongside the checkout pages.
pub async fn root_handler(
    State(state): State<AppState>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    request: Request,
) -> Response {
    match ws {
        Ok(ws) => {
            let relay = Arc::clone(&state.relay_service);
            ws.on_upgrade(move |socket| run_connection(socket, relay))
                .into_response()
        }
        Err(_) => match state.static_files.clone().oneshot(request).await {
            Ok(response) => response.into_response(),
            Err(never) => match never {},
        },
    }
}
