//! Relay service: pairs registrations with confirmations.

use std::sync::Arc;

use crate::domain::{
    ConnectionHandle, ConnectionId, Delivery, PaymentOutcome, PublicEndpoint, TransactionId,
    TransactionRegistry,
};
use crate::error::RelayError;

/// Orchestration layer for the transaction relay.
///
/// Owns references to the [`TransactionRegistry`] and the
/// [`PublicEndpoint`]. It adds logging and the confirmation contract on
/// top of them: an unknown transaction is a no-op, not an error.
#[derive(Debug, Clone)]
pub struct RelayService {
    registry: Arc<TransactionRegistry>,
    endpoint: PublicEndpoint,
}

impl RelayService {
    /// Creates a new `RelayService`.
    #[must_use]
    pub fn new(registry: Arc<TransactionRegistry>, endpoint: PublicEndpoint) -> Self {
        Self { registry, endpoint }
    }

    /// Returns a reference to the inner [`TransactionRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<TransactionRegistry> {
        &self.registry
    }

    /// Returns a reference to the inner [`PublicEndpoint`].
    #[must_use]
    pub fn endpoint(&self) -> &PublicEndpoint {
        &self.endpoint
    }

    /// Registers `handle` as the listener for `transaction_id`.
    pub async fn register(&self, transaction_id: TransactionId, handle: ConnectionHandle) {
        let connection_id = handle.id();
        let replaced = self.registry.register(transaction_id.clone(), handle).await;
        match replaced {
            Some(previous) => tracing::info!(
                %transaction_id,
                %connection_id,
                replaced = %previous,
                "re-registered client for transaction"
            ),
            None => tracing::info!(%transaction_id, %connection_id, "registered client for transaction"),
        }
    }

    /// Routes an external payment confirmation to the waiting client.
    ///
    /// A missing or empty transaction id is treated as an unknown
    /// transaction. Only `status == "success"` counts as a completed
    /// payment. Delivery is best-effort and never fails.
    pub async fn confirm_payment(
        &self,
        transaction_id: Option<&str>,
        status: Option<&str>,
    ) -> Delivery {
        tracing::info!(
            transaction_id = transaction_id.unwrap_or_default(),
            status = status.unwrap_or_default(),
            "received payment confirmation"
        );

        let Some(transaction_id) = transaction_id.and_then(|raw| TransactionId::new(raw)) else {
            tracing::info!("no active client found for empty transaction id");
            return Delivery::NoActiveClient;
        };

        let outcome = PaymentOutcome::from_status(status);
        let delivery = self.registry.resolve(&transaction_id, outcome).await;
        match delivery {
            Delivery::Delivered { connection_id, .. } => tracing::info!(
                %transaction_id,
                %connection_id,
                message_type = outcome.message_type_str(),
                "sent payment result to client"
            ),
            Delivery::ConnectionClosed { connection_id } => tracing::info!(
                %transaction_id,
                %connection_id,
                "client connection already closed"
            ),
            Delivery::NoActiveClient => {
                tracing::info!(%transaction_id, "no active client found");
            }
        }
        delivery
    }

    /// Drops every registration held by a closing connection.
    pub async fn disconnect(&self, connection_id: ConnectionId) {
        let removed = self.registry.unregister_connection(connection_id).await;
        if removed.is_empty() {
            tracing::debug!(%connection_id, "client disconnected");
        } else {
            let ids: Vec<&str> = removed.iter().map(TransactionId::as_str).collect();
            tracing::info!(%connection_id, transaction_ids = ?ids, "client disconnected; registrations dropped");
        }
    }

    /// Returns the public HTTP address.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::PublicUrlNotReady`] until the address has been
    /// discovered.
    pub fn public_url(&self) -> Result<String, RelayError> {
        self.endpoint.http_url().ok_or(RelayError::PublicUrlNotReady)
    }

    /// Returns the public WebSocket address.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::WebSocketUrlNotReady`] until the address has
    /// been discovered.
    pub fn ws_url(&self) -> Result<String, RelayError> {
        self.endpoint.ws_url().ok_or(RelayError::WebSocketUrlNotReady)
    }

    /// Returns the number of transactions awaiting confirmation.
    pub async fn active_transactions(&self) -> usize {
        self.registry.len().await
    }
}
