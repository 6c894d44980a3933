//! Cart domain types.

use serde::Serialize;

use ecomshop_core::CartItemId;

use super::product::Product;

/// One line of a user's cart, with its product embedded.
///
/// Owned exclusively by one user; every query that touches cart items filters
/// on the owner's id.
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product: Product,
    pub quantity: i32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ecomshop_core::ProductId;
    use rust_decimal::Decimal;

    #[test]
    fn test_cart_item_serializes_with_embedded_product() {
        let item = CartItem {
            id: CartItemId::new(5),
            product: Product {
                id: ProductId::new(2),
                name: "Wireless Headphones".to_string(),
                price: Decimal::from(3000),
                description: "Premium wireless headphones".to_string(),
                image: None,
            },
            quantity: 2,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], 5);
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["product"]["name"], "Wireless Headphones");
    }
}
