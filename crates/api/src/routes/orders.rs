//! Order route handlers.
//!
//! The checkout flow, from the frontend's point of view:
//!
//! 1. `POST /orders` - the backend creates a Razorpay order for the cart
//!    total, snapshots the cart into a local `PENDING` order, and returns
//!    `{ orderId, amount, currency, keyId }` for the hosted checkout overlay.
//! 2. The overlay collects payment and calls back into the SPA with a
//!    payment id, order id, and signature, which the SPA checks against the
//!    gateway.
//! 3. `POST /orders/verify` - the backend marks the caller's order `PAID`.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::order::Order;
use crate::services::orders::OrderService;
use crate::state::AppState;

/// Response for a freshly created checkout, consumed by the checkout overlay.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    /// Opaque gateway order id.
    pub order_id: String,
    /// Amount in the smallest currency unit (paise).
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Razorpay key id for the overlay.
    pub key_id: String,
}

/// Payment verification request body.
///
/// The payment id and signature come from the gateway's client-side success
/// callback; the signature is accepted but not checked server-side.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: Option<String>,
    pub razorpay_signature: Option<String>,
}

/// Convert the caller's cart into a pending order plus a gateway order.
///
/// The cart is cleared as a side effect, before payment is confirmed.
///
/// # Route
///
/// `POST /orders`
///
/// # Errors
///
/// Returns 400 for an empty cart, 502 if the gateway rejects the order.
#[instrument(skip(state))]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let orders = OrderService::new(state.pool(), state.razorpay());
    let session = orders.create_order(user.id).await?;

    tracing::info!(
        order_id = %session.order.id,
        razorpay_order_id = %session.gateway.id,
        "order created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            order_id: session.gateway.id,
            amount: session.gateway.amount,
            currency: session.gateway.currency,
            key_id: state.razorpay().key_id().to_string(),
        }),
    ))
}

/// Mark the caller's order as paid.
///
/// # Route
///
/// `POST /orders/verify`
///
/// # Errors
///
/// Returns 404 when no order with that gateway order id belongs to the
/// caller; state is left unchanged in that case.
#[instrument(skip(state, body))]
pub async fn verify(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<VerifyPaymentRequest>,
) -> Result<Json<Order>> {
    tracing::debug!(
        razorpay_order_id = %body.razorpay_order_id,
        has_signature = body.razorpay_signature.is_some(),
        "verifying payment"
    );

    let orders = OrderService::new(state.pool(), state.razorpay());
    let order = orders
        .verify_payment(
            user.id,
            &body.razorpay_order_id,
            body.razorpay_payment_id.as_deref(),
        )
        .await?;

    Ok(Json(order))
}

/// List the caller's orders, newest first.
///
/// # Route
///
/// `GET /orders`
///
/// # Errors
///
/// Returns 401 without a valid bearer token.
#[instrument(skip(state))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderService::new(state.pool(), state.razorpay());
    let list = orders.list_orders(user.id).await?;

    Ok(Json(list))
}
