//! Public endpoint discovery handlers.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::PublicUrlResponse;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, RelayError};

/// `GET /api/get-public-url` — Public HTTP address of the relay.
///
/// # Errors
///
/// Returns [`RelayError::PublicUrlNotReady`] until the tunnel has announced
/// its address.
#[utoipa::path(
    get,
    path = "/api/get-public-url",
    tag = "Discovery",
    summary = "Get the public HTTP URL",
    description = "Returns the address an external device uses to reach this relay.",
    responses(
        (status = 200, description = "Public URL", body = PublicUrlResponse),
        (status = 503, description = "Public URL not discovered yet", body = ErrorResponse),
    )
)]
pub async fn get_public_url(
    State(state): State<AppState>,
) -> Result<Json<PublicUrlResponse>, RelayError> {
    let url = state.relay_service.public_url()?;
    Ok(Json(PublicUrlResponse { url }))
}

/// `GET /api/get-ws-url` — Public WebSocket address of the relay.
///
/// # Errors
///
/// Returns [`RelayError::WebSocketUrlNotReady`] until the tunnel has
/// announced its address.
#[utoipa::path(
    get,
    path = "/api/get-ws-url",
    tag = "Discovery",
    summary = "Get the public WebSocket URL",
    description = "Same host as the public URL with a `ws`/`wss` scheme.",
    responses(
        (status = 200, description = "Public WebSocket URL", body = PublicUrlResponse),
        (status = 503, description = "Public URL not discovered yet", body = ErrorResponse),
    )
)]
pub async fn get_ws_url(
    State(state): State<AppState>,
) -> Result<Json<PublicUrlResponse>, RelayError> {
    let url = state.relay_service.ws_url()?;
    Ok(Json(PublicUrlResponse { url }))
}

/// Discovery routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/get-public-url", get(get_public_url))
        .route("/get-ws-url", get(get_ws_url))
}
