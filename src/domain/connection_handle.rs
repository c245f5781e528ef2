//! Sending half of a live WebSocket connection.
//!
//! The registry never touches the socket itself. Each connection task owns
//! an outbox receiver and forwards whatever arrives on it to the peer; the
//! registry only holds a [`ConnectionHandle`] wrapping the outbox sender.

use tokio::sync::mpsc;

use super::{ConnectionId, ResultMessage};

/// Cloneable handle used to push result messages to one connection.
///
/// The connection counts as open while its task still holds the outbox
/// receiver.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    outbox: mpsc::UnboundedSender<ResultMessage>,
}

impl ConnectionHandle {
    /// Creates a handle for connection `id` backed by `outbox`.
    #[must_use]
    pub const fn new(id: ConnectionId, outbox: mpsc::UnboundedSender<ResultMessage>) -> Self {
        Self { id, outbox }
    }

    /// Creates a fresh connection identity together with its outbox receiver.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ResultMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(ConnectionId::new(), tx), rx)
    }

    /// Returns the identity of the underlying connection.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// Returns `true` while the connection task is still reading its outbox.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.outbox.is_closed()
    }

    /// Queues `message` for delivery.
    ///
    /// Returns `false` if the connection has already gone away.
    pub fn send(&self, message: ResultMessage) -> bool {
        self.outbox.send(message).is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{PaymentOutcome, TransactionId};

    fn message() -> ResultMessage {
        let Some(id) = TransactionId::new("tx") else {
            panic!("valid transaction id");
        };
        PaymentOutcome::Success.into_message(id)
    }

    #[test]
    fn open_handle_delivers() {
        let (handle, mut rx) = ConnectionHandle::channel();
        assert!(handle.is_open());
        assert!(handle.send(message()));
        let Ok(received) = rx.try_recv() else {
            panic!("message not queued");
        };
        assert_eq!(received, message());
    }

    #[test]
    fn dropped_receiver_closes_handle() {
        let (handle, rx) = ConnectionHandle::channel();
        drop(rx);
        assert!(!handle.is_open());
        assert!(!handle.send(message()));
    }

    #[test]
    fn clones_share_identity() {
        let (handle, _rx) = ConnectionHandle::channel();
        assert_eq!(handle.clone().id(), handle.id());
    }
}
