//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection:
//! registration messages go to the [`RelayService`], and result messages
//! queued on the connection's outbox are written to the peer.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use super::messages::ClientMessage;
use crate::domain::ConnectionHandle;
use crate::service::RelayService;

/// Lifecycle of one WebSocket connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Connected, no transaction registered yet.
    Unregistered,
    /// Connected and listening for at least one transaction.
    Registered,
    /// The peer went away; registrations have been dropped.
    Closed,
}

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads client frames and registers transactions.
/// - Forwards result messages from the outbox to the client.
/// - On close, drops every registration held by this connection.
pub async fn run_connection(socket: WebSocket, relay: Arc<RelayService>) {
    let (handle, mut outbox) = ConnectionHandle::channel();
    let connection_id = handle.id();
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut state = ConnectionState::Unregistered;

    tracing::info!(%connection_id, "client connected");

    while state != ConnectionState::Closed {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        state = handle_text(&relay, &handle, state, text.as_str()).await;
                    }
                    Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                        Ok(text) => state = handle_text(&relay, &handle, state, text).await,
                        Err(e) => {
                            tracing::warn!(%connection_id, error = %e, "failed to parse message");
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => state = ConnectionState::Closed,
                    Some(Err(e)) => {
                        tracing::debug!(%connection_id, error = %e, "ws transport error");
                        state = ConnectionState::Closed;
                    }
                    Some(Ok(_)) => {}
                }
            }
            // Result pushed by a confirmation
            Some(result) = outbox.recv() => {
                let json = match serde_json::to_string(&result) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!(%connection_id, error = %e, "failed to encode result message");
                        continue;
                    }
                };
                if ws_tx.send(Message::text(json)).await.is_err() {
                    state = ConnectionState::Closed;
                }
            }
        }
    }

    // Closing the outbox first makes concurrent confirmations see the
    // connection as gone.
    drop(outbox);
    relay.disconnect(connection_id).await;
}

/// Processes one text frame and returns the next connection state.
async fn handle_text(
    relay: &RelayService,
    handle: &ConnectionHandle,
    state: ConnectionState,
    text: &str,
) -> ConnectionState {
    match ClientMessage::parse(text) {
        Ok(ClientMessage::Register { transaction_id }) => {
            relay.register(transaction_id, handle.clone()).await;
            ConnectionState::Registered
        }
        Ok(ClientMessage::Ignored) => {
            tracing::trace!(connection_id = %handle.id(), "ignored client message");
            state
        }
        Err(e) => {
            tracing::warn!(connection_id = %handle.id(), error = %e, "failed to parse message");
            state
        }
    }
}
