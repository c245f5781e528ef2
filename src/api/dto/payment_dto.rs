//! Payment confirmation DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Acknowledgement text returned for every accepted confirmation.
pub const CONFIRMATION_RECEIVED: &str = "Confirmation received";

/// Request body for `POST /api/confirm-payment`.
///
/// Both fields are optional on the wire: a missing transaction id is an
/// unknown transaction and a missing status counts as a cancellation.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    /// Transaction being confirmed.
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// `"success"` for a completed payment; anything else cancels.
    #[serde(default)]
    pub status: Option<String>,
}

impl ConfirmPaymentRequest {
    /// Parses a raw request body regardless of its declared content type.
    ///
    /// An empty body, or one that is not a JSON object, yields an empty
    /// request, which the relay treats as an unknown transaction.
    #[must_use]
    pub fn from_body(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::default();
        }
        serde_json::from_slice(body).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "unparseable confirmation body");
            Self::default()
        })
    }
}

/// Response body for `POST /api/confirm-payment`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConfirmationResponse {
    /// Always [`CONFIRMATION_RECEIVED`].
    pub message: String,
}

impl ConfirmationResponse {
    /// Builds the standard acknowledgement.
    #[must_use]
    pub fn received() -> Self {
        Self {
            message: CONFIRMATION_RECEIVED.to_string(),
        }
    }
}
