//! Payment outcomes and the result messages pushed to registered clients.

use serde::Serialize;

use super::TransactionId;

/// Status string that the confirmation source sends for a completed payment.
pub const SUCCESS_STATUS: &str = "success";

/// Final outcome of a checkout as reported by the confirmation source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOutcome {
    /// The payment went through.
    Success,
    /// The payment was cancelled or failed.
    Cancelled,
}

impl PaymentOutcome {
    /// Maps a free-form status string to an outcome.
    ///
    /// Only the exact string `"success"` is a success; everything else,
    /// including a missing status, is treated as a cancellation.
    #[must_use]
    pub fn from_status(status: Option<&str>) -> Self {
        match status {
            Some(SUCCESS_STATUS) => Self::Success,
            _ => Self::Cancelled,
        }
    }

    /// Builds the result message for `transaction_id`.
    #[must_use]
    pub fn into_message(self, transaction_id: TransactionId) -> ResultMessage {
        match self {
            Self::Success => ResultMessage::PaymentSuccess { transaction_id },
            Self::Cancelled => ResultMessage::PaymentCancelled { transaction_id },
        }
    }

    /// Returns the wire `type` of the message this outcome produces.
    #[must_use]
    pub const fn message_type_str(self) -> &'static str {
        match self {
            Self::Success => "payment_success",
            Self::Cancelled => "payment_cancelled",
        }
    }
}

/// Server → client push carrying the outcome of one transaction.
///
/// Serializes as `{"type":"payment_success","transactionId":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResultMessage {
    /// The payment for `transaction_id` completed.
    PaymentSuccess {
        /// Transaction the result belongs to.
        #[serde(rename = "transactionId")]
        transaction_id: TransactionId,
    },
    /// The payment for `transaction_id` was cancelled.
    PaymentCancelled {
        /// Transaction the result belongs to.
        #[serde(rename = "transactionId")]
        transaction_id: TransactionId,
    },
}

impl ResultMessage {
    /// Returns the transaction id the message is tagged with.
    #[must_use]
    pub const fn transaction_id(&self) -> &TransactionId {
        match self {
            Self::PaymentSuccess { transaction_id } | Self::PaymentCancelled { transaction_id } => {
                transaction_id
            }
        }
    }

    /// Returns the outcome this message reports.
    #[must_use]
    pub const fn outcome(&self) -> PaymentOutcome {
        match self {
            Self::PaymentSuccess { .. } => PaymentOutcome::Success,
            Self::PaymentCancelled { .. } => PaymentOutcome::Cancelled,
        }
    }
}
