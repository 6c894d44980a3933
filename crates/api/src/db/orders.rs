//! Order repository.
//!
//! Order creation is the one multi-statement sequence in the system: read the
//! cart, insert the order and its line-item snapshots, clear the cart. It runs
//! in a single transaction keyed by the unique gateway order id, so a
//! double-submission conflicts instead of creating a second order.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use ecomshop_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

use super::RepositoryError;
use crate::models::order::{Order, OrderItem};
use crate::models::product::Product;

/// Raw `orders` row.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    total_amount: Decimal,
    razorpay_order_id: String,
    status: String,
    razorpay_payment_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, RepositoryError> {
        let status: OrderStatus = self.status.parse().map_err(|e: String| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;

        Ok(Order {
            id: OrderId::new(self.id),
            user_id: UserId::new(self.user_id),
            total_amount: self.total_amount,
            razorpay_order_id: self.razorpay_order_id,
            status,
            razorpay_payment_id: self.razorpay_payment_id,
            created_at: self.created_at,
            order_items: items,
        })
    }
}

/// Line item joined with its product snapshot source.
#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    quantity: i32,
    price: Decimal,
    product_name: String,
    product_price: Decimal,
    product_description: String,
    product_image: Option<String>,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: ProductId::new(row.product_id),
            product: Product {
                id: ProductId::new(row.product_id),
                name: row.product_name,
                price: row.product_price,
                description: row.product_description,
                image: row.product_image,
            },
            quantity: row.quantity,
            price: row.price,
        }
    }
}

/// Cart line with the live product price, read at order-creation time.
#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    product_id: i32,
    quantity: i32,
    price: Decimal,
}

const ORDER_COLUMNS: &str =
    "id, user_id, total_amount, razorpay_order_id, status, razorpay_payment_id, created_at";

const ORDER_ITEM_SELECT: &str = "
    SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, oi.price,
           p.name AS product_name,
           p.price AS product_price,
           p.description AS product_description,
           p.image AS product_image
    FROM order_items oi
    JOIN products p ON p.id = oi.product_id";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Convert the user's cart into a `PENDING` order.
    ///
    /// Reads the cart, totals `price × quantity` over its lines, inserts the
    /// order plus per-line price snapshots, and deletes the cart items - all
    /// in one transaction. The cart is cleared even though payment has not
    /// been confirmed yet; that is the source system's behavior.
    ///
    /// Returns `None` if the cart is empty (no order is created).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if an order already exists for
    /// `razorpay_order_id`.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_from_cart(
        &self,
        user_id: UserId,
        razorpay_order_id: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let lines = sqlx::query_as::<_, CartLineRow>(
            "SELECT ci.product_id, ci.quantity, p.price
             FROM cart_items ci
             JOIN products p ON p.id = ci.product_id
             WHERE ci.user_id = $1
             ORDER BY ci.id",
        )
        .bind(user_id.as_i32())
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            return Ok(None);
        }

        let total: Decimal = lines
            .iter()
            .map(|line| line.price * Decimal::from(line.quantity))
            .sum();

        let order: (i32,) = sqlx::query_as(
            "INSERT INTO orders (user_id, total_amount, razorpay_order_id, status)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(user_id.as_i32())
        .bind(total)
        .bind(razorpay_order_id)
        .bind(OrderStatus::Pending.to_string())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(
                    "order already exists for this gateway order id".to_owned(),
                );
            }
            RepositoryError::Database(e)
        })?;

        for line in &lines {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, price)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(order.0)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.price)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id.as_i32())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let order = self.get_with_items(OrderId::new(order.0)).await?;
        order.ok_or(RepositoryError::NotFound).map(Some)
    }

    /// Mark the order for `razorpay_order_id` as `PAID`, scoped to the caller.
    ///
    /// Unconditional: a `PAID` order stays `PAID` and marking it again
    /// succeeds. Records the gateway payment id when one is supplied.
    ///
    /// Returns `None` if no order with that gateway id belongs to the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn mark_paid(
        &self,
        user_id: UserId,
        razorpay_order_id: &str,
        razorpay_payment_id: Option<&str>,
    ) -> Result<Option<Order>, RepositoryError> {
        let updated: Option<(i32,)> = sqlx::query_as(
            "UPDATE orders
             SET status = $3, razorpay_payment_id = COALESCE($4, razorpay_payment_id)
             WHERE razorpay_order_id = $1 AND user_id = $2
             RETURNING id",
        )
        .bind(razorpay_order_id)
        .bind(user_id.as_i32())
        .bind(OrderStatus::Paid.to_string())
        .bind(razorpay_payment_id)
        .fetch_optional(self.pool)
        .await?;

        match updated {
            Some((id,)) => self.get_with_items(OrderId::new(id)).await,
            None => Ok(None),
        }
    }

    /// Fetch one order with its line items and product snapshots.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_with_items(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItemRow>(&format!(
            "{ORDER_ITEM_SELECT} WHERE oi.order_id = $1 ORDER BY oi.id"
        ))
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;

        let items = items.into_iter().map(OrderItem::from).collect();
        row.into_order(items).map(Some)
    }

    /// List a user's orders, newest first, each with line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let item_rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "{ORDER_ITEM_SELECT} WHERE oi.order_id = ANY($1) ORDER BY oi.id"
        ))
        .bind(&order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = item_rows
                .iter()
                .filter(|item| item.order_id == row.id)
                .cloned()
                .map(OrderItem::from)
                .collect();
            orders.push(row.into_order(items)?);
        }

        Ok(orders)
    }
}
