//! OpenAPI document for the relay's REST surface.

use utoipa::OpenApi;

use crate::api::dto::{ConfirmPaymentRequest, ConfirmationResponse, PublicUrlResponse};
use crate::api::handlers::system::HealthResponse;
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI specification, served by Swagger UI when the
/// `swagger-ui` feature is enabled.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "checkout-relay",
        description = "Pairs browser checkout sessions with external payment confirmations."
    ),
    paths(
        crate::api::handlers::payment::confirm_payment,
        crate::api::handlers::discovery::get_public_url,
        crate::api::handlers::discovery::get_ws_url,
        crate::api::handlers::system::health_handler,
    ),
    components(schemas(
        ConfirmPaymentRequest,
        ConfirmationResponse,
        PublicUrlResponse,
        HealthResponse,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "Payments", description = "Payment confirmation relay"),
        (name = "Discovery", description = "Public endpoint discovery"),
        (name = "System", description = "Operational endpoints"),
    )
)]
pub struct ApiDoc;
