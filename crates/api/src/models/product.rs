//! Product catalog types.

use rust_decimal::Decimal;
use serde::Serialize;

use ecomshop_core::ProductId;

/// A catalog entry.
///
/// Immutable from the storefront's perspective; seeded and administered
/// externally via the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
