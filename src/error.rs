//! Relay error types with HTTP status code mapping.
//!
//! [`RelayError`] is the central error type for the relay. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//! Unknown transactions and closed sockets are not errors: the confirmation
//! path absorbs them (see [`crate::domain::Delivery`]).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "public URL is not ready yet; please try again in a moment"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Failures while starting or reading the outbound tunnel.
#[derive(Debug, thiserror::Error)]
pub enum TunnelError {
    /// The tunnel program could not be launched.
    #[error("failed to start tunnel `{program}`: {source}")]
    Spawn {
        /// Program that was executed.
        program: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The configured URL pattern is not a valid regular expression.
    #[error("invalid tunnel URL pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The child process was started without a piped output stream.
    #[error("tunnel {0} was not captured")]
    MissingPipe(&'static str),
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                 |
/// |-----------|-----------------|-----------------------------|
/// | 2000–2999 | Not Ready       | 503 Service Unavailable     |
/// | 3000–3999 | Server          | 500 Internal Server Error   |
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The public HTTP address has not been discovered yet.
    #[error("public URL is not ready yet; please try again in a moment")]
    PublicUrlNotReady,

    /// The public WebSocket address has not been discovered yet.
    #[error("public WebSocket URL is not ready yet")]
    WebSocketUrlNotReady,

    /// Configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The public endpoint exposer failed.
    #[error("tunnel error: {0}")]
    Tunnel(#[from] TunnelError),
}

impl RelayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::PublicUrlNotReady => 2001,
            Self::WebSocketUrlNotReady => 2002,
            Self::Config(_) => 3001,
            Self::Tunnel(_) => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::PublicUrlNotReady | Self::WebSocketUrlNotReady => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Config(_) | Self::Tunnel(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
