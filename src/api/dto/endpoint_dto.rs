//! Public endpoint discovery DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response body for `GET /api/get-public-url` and `GET /api/get-ws-url`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicUrlResponse {
    /// Publicly reachable address of the relay.
    pub url: String,
}
