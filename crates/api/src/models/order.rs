//! Order domain types.
//!
//! Orders snapshot the cart at purchase time: each [`OrderItem`] records the
//! unit price the product had when the order was created, so historical orders
//! stay accurate when catalog prices change later.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use ecomshop_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

use super::product::Product;

/// A purchase record.
///
/// Immutable once created, except for `status` (`PENDING` → `PAID`) and the
/// gateway payment id recorded at verification time. The invariant is that
/// `total_amount` equals the sum of line items at creation time; it is never
/// recomputed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total_amount: Decimal,
    pub razorpay_order_id: String,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razorpay_payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub order_items: Vec<OrderItem>,
}

/// A line-item snapshot within an order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product: Product,
    pub quantity: i32,
    /// Unit price at the time of purchase (not the live catalog price).
    pub price: Decimal,
}

impl Order {
    /// Sum of `unit price × quantity` over the line items.
    ///
    /// Matches `total_amount` for any order produced by order creation; used
    /// by tests to assert the snapshot invariant.
    #[must_use]
    pub fn line_item_total(&self) -> Decimal {
        self.order_items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i32, name: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Decimal::from(price),
            description: String::new(),
            image: None,
        }
    }

    #[test]
    fn test_line_item_total_matches_total_amount() {
        // cart = [{Laptop, 50000, qty 1}, {Headphones, 3000, qty 2}] -> 56000
        let order = Order {
            id: OrderId::new(1),
            user_id: UserId::new(1),
            total_amount: Decimal::from(56000),
            razorpay_order_id: "order_abc".to_string(),
            status: OrderStatus::Pending,
            razorpay_payment_id: None,
            created_at: Utc::now(),
            order_items: vec![
                OrderItem {
                    id: OrderItemId::new(1),
                    order_id: OrderId::new(1),
                    product_id: ProductId::new(1),
                    product: product(1, "Laptop", 50000),
                    quantity: 1,
                    price: Decimal::from(50000),
                },
                OrderItem {
                    id: OrderItemId::new(2),
                    order_id: OrderId::new(1),
                    product_id: ProductId::new(3),
                    product: product(3, "Wireless Headphones", 3000),
                    quantity: 2,
                    price: Decimal::from(3000),
                },
            ],
        };

        assert_eq!(order.line_item_total(), order.total_amount);
    }

    #[test]
    fn test_order_json_shape() {
        let order = Order {
            id: OrderId::new(9),
            user_id: UserId::new(4),
            total_amount: Decimal::from(3000),
            razorpay_order_id: "order_xyz".to_string(),
            status: OrderStatus::Paid,
            razorpay_payment_id: Some("pay_123".to_string()),
            created_at: Utc::now(),
            order_items: vec![],
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["userId"], 4);
        assert_eq!(json["razorpayOrderId"], "order_xyz");
        assert_eq!(json["razorpayPaymentId"], "pay_123");
        assert_eq!(json["status"], "PAID");
        assert!(json["orderItems"].as_array().unwrap().is_empty());
    }
}
