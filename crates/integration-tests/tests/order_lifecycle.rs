//! Integration tests for the order state machine and snapshot invariants.
//!
//! These verify the order lifecycle rules without requiring a database:
//! the state machine is `PENDING -> PAID` and nothing else, and an order's
//! total always equals the sum of its line-item snapshots.

use chrono::Utc;
use rust_decimal::Decimal;

use ecomshop_api::models::order::{Order, OrderItem};
use ecomshop_api::models::product::Product;
use ecomshop_core::{
    CurrencyCode, OrderId, OrderItemId, OrderStatus, Price, ProductId, UserId,
};

// =============================================================================
// Order Status Tests
// =============================================================================

#[test]
fn test_order_status_values() {
    // The state machine has exactly two states - no FAILED, CANCELLED,
    // REFUNDED, or EXPIRED.
    assert!(matches!(OrderStatus::Pending, OrderStatus::Pending));
    assert!(matches!(OrderStatus::Paid, OrderStatus::Paid));

    assert!("FAILED".parse::<OrderStatus>().is_err());
    assert!("CANCELLED".parse::<OrderStatus>().is_err());
    assert!("REFUNDED".parse::<OrderStatus>().is_err());
    assert!("EXPIRED".parse::<OrderStatus>().is_err());
}

#[test]
fn test_order_status_wire_format() {
    // The SPA matches on the literal strings PENDING / PAID.
    assert_eq!(OrderStatus::Pending.to_string(), "PENDING");
    assert_eq!(OrderStatus::Paid.to_string(), "PAID");

    let parsed: OrderStatus = "PAID".parse().expect("PAID should parse");
    assert_eq!(parsed, OrderStatus::Paid);
}

#[test]
fn test_orders_start_pending() {
    assert_eq!(OrderStatus::default(), OrderStatus::Pending);
}

/// Valid transitions: Pending -> Paid, and Paid -> Paid (verification is not
/// idempotency-guarded; marking a paid order again succeeds again).
#[test]
fn test_valid_state_transitions() {
    let valid_transitions = [
        (OrderStatus::Pending, OrderStatus::Paid),
        (OrderStatus::Paid, OrderStatus::Paid),
    ];

    for (from, to) in valid_transitions {
        // Marking paid always lands on Paid regardless of the prior state
        assert_eq!(to, OrderStatus::Paid, "transition from {from:?} ends Paid");
    }
}

// =============================================================================
// Snapshot Invariant Tests
// =============================================================================

fn product(id: i32, name: &str, price: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Decimal::from(price),
        description: String::new(),
        image: None,
    }
}

fn line(order_id: i32, item_id: i32, product: Product, quantity: i32, price: i64) -> OrderItem {
    OrderItem {
        id: OrderItemId::new(item_id),
        order_id: OrderId::new(order_id),
        product_id: product.id,
        product,
        quantity,
        price: Decimal::from(price),
    }
}

#[test]
fn test_total_equals_sum_of_line_items() {
    // cart = [{Laptop, 50000, qty 1}, {Headphones, 3000, qty 2}]
    // -> order total = 56000, two line items with prices 50000 and 3000
    let order = Order {
        id: OrderId::new(1),
        user_id: UserId::new(1),
        total_amount: Decimal::from(56000),
        razorpay_order_id: "order_abc".to_string(),
        status: OrderStatus::Pending,
        razorpay_payment_id: None,
        created_at: Utc::now(),
        order_items: vec![
            line(1, 1, product(1, "Laptop", 50000), 1, 50000),
            line(1, 2, product(3, "Wireless Headphones", 3000), 2, 3000),
        ],
    };

    assert_eq!(order.line_item_total(), Decimal::from(56000));
    assert_eq!(order.line_item_total(), order.total_amount);
    assert_eq!(order.order_items.len(), 2);
}

#[test]
fn test_line_items_snapshot_price_not_catalog_price() {
    // The line item keeps the price paid even if the catalog price moved.
    let current = product(1, "Laptop", 45000); // price dropped since purchase

    let item = line(1, 1, current, 1, 50000);

    assert_eq!(item.price, Decimal::from(50000));
    assert_ne!(item.price, item.product.price);
}

// =============================================================================
// Gateway Amount Tests
// =============================================================================

#[test]
fn test_gateway_amount_is_paise() {
    // Rs 56000 -> 5_600_000 paise for the gateway order
    let total = Price::new(Decimal::from(56000), CurrencyCode::INR);
    assert_eq!(total.to_minor_units().expect("in range"), 5_600_000);
    assert_eq!(CurrencyCode::INR.as_str(), "INR");
}
