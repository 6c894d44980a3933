//! Order/payment service.
//!
//! Turns a cart into a paid order via the Razorpay gateway:
//! create a gateway order for the cart total, snapshot the cart into a
//! `PENDING` local order, and later mark it `PAID` when the frontend reports
//! a completed checkout. The backend performs no signature or amount check of
//! its own; it trusts what the frontend verified against the gateway.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use ecomshop_core::{CurrencyCode, Price, PriceError, UserId};

use crate::db::RepositoryError;
use crate::db::cart::CartRepository;
use crate::db::orders::OrderRepository;
use crate::models::order::Order;
use crate::razorpay::{GatewayError, GatewayOrder, RazorpayClient};

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The caller's cart has no items.
    #[error("no items in cart")]
    EmptyCart,

    /// No order with that gateway order id belongs to the caller.
    #[error("order not found")]
    NotFound,

    /// An order already exists for this gateway order id.
    #[error("order already exists for this gateway order id")]
    DuplicateOrder,

    /// The cart total cannot be expressed in gateway minor units.
    #[error("invalid order amount: {0}")]
    Amount(#[from] PriceError),

    /// The payment gateway rejected or failed the order-creation call.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// A freshly created checkout: the local `PENDING` order plus the gateway
/// order the checkout overlay needs.
#[derive(Debug)]
pub struct CheckoutSession {
    pub order: Order,
    pub gateway: GatewayOrder,
}

/// Order/payment service.
pub struct OrderService<'a> {
    carts: CartRepository<'a>,
    orders: OrderRepository<'a>,
    razorpay: &'a RazorpayClient,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, razorpay: &'a RazorpayClient) -> Self {
        Self {
            carts: CartRepository::new(pool),
            orders: OrderRepository::new(pool),
            razorpay,
        }
    }

    /// Convert the caller's cart into a gateway order plus a local `PENDING`
    /// order.
    ///
    /// The cart is destructively cleared as part of order creation, before
    /// payment is confirmed - if the checkout then fails, the cart is already
    /// gone. That is the source system's behavior, kept as-is.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyCart` if the cart has no items (no order is
    /// created), `OrderError::Gateway` if Razorpay rejects the order, and
    /// `OrderError::DuplicateOrder` if the gateway order id was already used.
    pub async fn create_order(&self, user_id: UserId) -> Result<CheckoutSession, OrderError> {
        let items = self.carts.list(user_id).await?;
        if items.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let total: Decimal = items
            .iter()
            .map(|item| item.product.price * Decimal::from(item.quantity))
            .sum();

        let currency = CurrencyCode::default();
        let amount = Price::new(total, currency).to_minor_units()?;
        let receipt = format!("rcpt-{}", Uuid::new_v4());

        let gateway = self
            .razorpay
            .create_order(amount, currency.as_str(), &receipt)
            .await?;

        let order = self
            .orders
            .create_from_cart(user_id, &gateway.id)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => OrderError::DuplicateOrder,
                other => OrderError::Repository(other),
            })?
            // The cart emptied between the total computation and the
            // transaction's own read (concurrent clear); same outcome as an
            // empty cart up front.
            .ok_or(OrderError::EmptyCart)?;

        Ok(CheckoutSession { order, gateway })
    }

    /// Mark the caller's order for `razorpay_order_id` as `PAID`.
    ///
    /// Not idempotent-guarded: marking a `PAID` order again succeeds again.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if no order with that gateway id
    /// belongs to the caller; state is left unchanged in that case.
    pub async fn verify_payment(
        &self,
        user_id: UserId,
        razorpay_order_id: &str,
        razorpay_payment_id: Option<&str>,
    ) -> Result<Order, OrderError> {
        self.orders
            .mark_paid(user_id, razorpay_order_id, razorpay_payment_id)
            .await?
            .ok_or(OrderError::NotFound)
    }

    /// List the caller's orders, newest first, with line items.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if a database operation fails.
    pub async fn list_orders(&self, user_id: UserId) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list_for_user(user_id).await?)
    }
}
