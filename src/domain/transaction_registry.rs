//! In-memory transaction → connection registry.
//!
//! [`TransactionRegistry`] pairs a transaction id with the WebSocket
//! connection waiting for its outcome. A reverse index keyed by
//! [`ConnectionId`] lets a closing connection drop its entries without
//! scanning the whole map.

use std::collections::{HashMap, HashSet};

use tokio::sync::Mutex;

use super::{ConnectionHandle, ConnectionId, PaymentOutcome, TransactionId};

/// Result of routing a confirmation through the registry.
///
/// None of these is an error: delivery is best-effort and the confirming
/// caller is acknowledged regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The result message was queued on the registered connection and the
    /// entry was removed.
    Delivered {
        /// Connection that received the message.
        connection_id: ConnectionId,
        /// Outcome that was pushed.
        outcome: PaymentOutcome,
    },
    /// An entry exists but its connection is gone. The entry is left for
    /// the close handler to remove.
    ConnectionClosed {
        /// Connection that can no longer be written to.
        connection_id: ConnectionId,
    },
    /// No connection is registered under the transaction id.
    NoActiveClient,
}

impl Delivery {
    /// Returns `true` if a result message was handed to a connection.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

#[derive(Debug, Default)]
struct RegistryInner {
    by_transaction: HashMap<TransactionId, ConnectionHandle>,
    by_connection: HashMap<ConnectionId, HashSet<TransactionId>>,
}

impl RegistryInner {
    /// Removes `transaction_id` from the reverse index of `connection_id`.
    fn detach(&mut self, connection_id: ConnectionId, transaction_id: &TransactionId) {
        if let Some(owned) = self.by_connection.get_mut(&connection_id) {
            owned.remove(transaction_id);
            if owned.is_empty() {
                self.by_connection.remove(&connection_id);
            }
        }
    }
}

/// Registry of transactions awaiting a confirmation.
///
/// # Concurrency
///
/// Both indexes live behind a single [`tokio::sync::Mutex`], so register,
/// resolve and unregister are atomic with respect to each other. No lock is
/// held across a socket write: resolving only queues the message on the
/// connection's outbox.
#[derive(Debug, Default)]
pub struct TransactionRegistry {
    inner: Mutex<RegistryInner>,
}

impl TransactionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `transaction_id` with `handle`.
    ///
    /// Last write wins. If another connection was registered under the same
    /// id, it is silently replaced and its id is returned.
    pub async fn register(
        &self,
        transaction_id: TransactionId,
        handle: ConnectionHandle,
    ) -> Option<ConnectionId> {
        let connection_id = handle.id();
        let mut inner = self.inner.lock().await;

        let replaced = inner
            .by_transaction
            .insert(transaction_id.clone(), handle)
            .map(|previous| previous.id())
            .filter(|previous| *previous != connection_id);
        if let Some(previous) = replaced {
            inner.detach(previous, &transaction_id);
        }

        inner
            .by_connection
            .entry(connection_id)
            .or_default()
            .insert(transaction_id);
        replaced
    }

    /// Pushes `outcome` to the connection registered under `transaction_id`.
    ///
    /// The entry is removed only when the message was actually queued, so a
    /// repeated call is a no-op reported as [`Delivery::NoActiveClient`].
    pub async fn resolve(
        &self,
        transaction_id: &TransactionId,
        outcome: PaymentOutcome,
    ) -> Delivery {
        let mut inner = self.inner.lock().await;

        let Some(handle) = inner.by_transaction.get(transaction_id) else {
            return Delivery::NoActiveClient;
        };
        let connection_id = handle.id();
        if !handle.is_open() || !handle.send(outcome.into_message(transaction_id.clone())) {
            return Delivery::ConnectionClosed { connection_id };
        }

        inner.by_transaction.remove(transaction_id);
        inner.detach(connection_id, transaction_id);
        Delivery::Delivered {
            connection_id,
            outcome,
        }
    }

    /// Removes every entry still owned by `connection_id`.
    ///
    /// Ids that a later registration took over belong to the newer
    /// connection and are left alone. Returns the removed ids.
    pub async fn unregister_connection(&self, connection_id: ConnectionId) -> Vec<TransactionId> {
        let mut inner = self.inner.lock().await;

        let Some(owned) = inner.by_connection.remove(&connection_id) else {
            return Vec::new();
        };

        let mut removed = Vec::with_capacity(owned.len());
        for transaction_id in owned {
            let still_owned = inner
                .by_transaction
                .get(&transaction_id)
                .is_some_and(|handle| handle.id() == connection_id);
            if still_owned {
                inner.by_transaction.remove(&transaction_id);
                removed.push(transaction_id);
            }
        }
        removed
    }

    /// Returns the connection currently registered under `transaction_id`.
    pub async fn owner(&self, transaction_id: &TransactionId) -> Option<ConnectionId> {
        self.inner
            .lock()
            .await
            .by_transaction
            .get(transaction_id)
            .map(ConnectionHandle::id)
    }

    /// Returns the number of registered transactions.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.by_transaction.len()
    }

    /// Returns `true` if no transaction is registered.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.by_transaction.is_empty()
    }
}
