//! Razorpay API request/response shapes.
//!
//! Vendor-defined; only the fields this system reads are modeled.

use serde::{Deserialize, Serialize};

/// Request body for `POST /v1/orders`.
#[derive(Debug, Serialize)]
pub struct CreateOrderRequest<'a> {
    /// Amount in the smallest currency unit.
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: &'a str,
    /// Merchant-side reference.
    pub receipt: &'a str,
}

/// A gateway order, as returned by `POST /v1/orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    /// Opaque gateway order id (e.g., `order_EKwxwAgItmmXdp`).
    pub id: String,
    /// Amount in the smallest currency unit.
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// Error envelope returned by the Razorpay API.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details inside [`ErrorResponse`].
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_order_parses_vendor_response() {
        // Abridged from Razorpay's documented response; extra fields ignored.
        let json = r#"{
            "id": "order_EKwxwAgItmmXdp",
            "entity": "order",
            "amount": 5600000,
            "amount_paid": 0,
            "currency": "INR",
            "receipt": "rcpt-1",
            "status": "created"
        }"#;

        let order: GatewayOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.id, "order_EKwxwAgItmmXdp");
        assert_eq!(order.amount, 5_600_000);
        assert_eq!(order.currency, "INR");
    }

    #[test]
    fn test_error_response_parses() {
        let json = r#"{"error":{"code":"BAD_REQUEST_ERROR","description":"Order amount less than minimum"}}"#;
        let err: ErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(err.error.code, "BAD_REQUEST_ERROR");
        assert_eq!(err.error.description, "Order amount less than minimum");
    }

    #[test]
    fn test_create_order_request_serializes() {
        let req = CreateOrderRequest {
            amount: 5_600_000,
            currency: "INR",
            receipt: "rcpt-1",
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["amount"], 5_600_000);
        assert_eq!(json["currency"], "INR");
    }
}
