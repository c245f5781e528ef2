//! Inbound WebSocket message parsing.
//!
//! The relay understands exactly one client message:
//!
//! ```json
//! { "type": "register", "transactionId": "tx-1" }
//! ```
//!
//! Anything else that is valid JSON is ignored. Outbound messages are
//! [`crate::domain::ResultMessage`]s.

use crate::domain::TransactionId;

/// `type` value of a registration message.
pub const REGISTER_TYPE: &str = "register";

/// A successfully parsed client message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Listen for the outcome of `transaction_id`.
    Register {
        /// Transaction to associate with this connection.
        transaction_id: TransactionId,
    },
    /// Valid JSON with no meaning to the relay.
    Ignored,
}

impl ClientMessage {
    /// Parses a text frame.
    ///
    /// A registration needs `type == "register"` and a non-empty string
    /// `transactionId`; every other JSON value parses as
    /// [`ClientMessage::Ignored`].
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] if `text` is not valid JSON.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(text)?;

        if value.get("type").and_then(|v| v.as_str()) != Some(REGISTER_TYPE) {
            return Ok(Self::Ignored);
        }

        Ok(value
            .get("transactionId")
            .and_then(|v| v.as_str())
            .and_then(|raw| TransactionId::new(raw))
            .map_or(Self::Ignored, |transaction_id| Self::Register {
                transaction_id,
            }))
    }
}
