//! Payment confirmation handler.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{ConfirmPaymentRequest, ConfirmationResponse};
use crate::app_state::AppState;

/// `POST /api/confirm-payment` — Report the outcome of a transaction.
///
/// Always acknowledges with 200: delivery to the waiting checkout page is
/// best-effort and an unknown transaction is not an error. The body is read
/// as JSON whatever its `Content-Type`; an unreadable body is treated as an
/// unknown transaction.
#[utoipa::path(
    post,
    path = "/api/confirm-payment",
    tag = "Payments",
    summary = "Confirm a payment",
    description = "Called by the payment confirmation source. Pushes `payment_success` (status `success`) or `payment_cancelled` (any other status) to the WebSocket registered for the transaction, if any.",
    request_body = ConfirmPaymentRequest,
    responses(
        (status = 200, description = "Confirmation accepted", body = ConfirmationResponse),
    )
)]
pub async fn confirm_payment(
    State(state): State<AppState>,
    body: Bytes,
) -> impl IntoResponse {
    let req = ConfirmPaymentRequest::from_body(&body);
    let _ = state
        .relay_service
        .confirm_payment(req.transaction_id.as_deref(), req.status.as_deref())
        .await;

    (StatusCode::OK, Json(ConfirmationResponse::received()))
}

/// Payment routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/confirm-payment", post(confirm_payment))
}
