//! Razorpay Orders API client.
//!
//! The backend consumes Razorpay two ways:
//!
//! - a server-side REST call that creates a gateway order (this module), and
//! - the hosted checkout overlay, which the frontend drives with the
//!   `{ orderId, amount, currency, keyId }` handed back by `POST /orders`.
//!
//! Amounts are in the currency's smallest unit (paise for INR).

pub mod types;

pub use types::GatewayOrder;

use std::sync::Arc;

use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::instrument;

use crate::config::RazorpayConfig;
use types::{CreateOrderRequest, ErrorResponse};

/// Errors that can occur when calling the Razorpay API.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Razorpay rejected the request.
    #[error("gateway error ({status}): {message}")]
    Api {
        /// HTTP status returned by Razorpay.
        status: u16,
        /// Error description from the response body.
        message: String,
    },
}

/// Client for the Razorpay Orders API.
#[derive(Clone)]
pub struct RazorpayClient {
    inner: Arc<RazorpayClientInner>,
}

struct RazorpayClientInner {
    client: reqwest::Client,
    api_url: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayClient {
    /// Create a new Razorpay client.
    #[must_use]
    pub fn new(config: &RazorpayConfig) -> Self {
        Self {
            inner: Arc::new(RazorpayClientInner {
                client: reqwest::Client::new(),
                api_url: config.api_url.trim_end_matches('/').to_string(),
                key_id: config.key_id.clone(),
                key_secret: config.key_secret.expose_secret().to_string(),
            }),
        }
    }

    /// The key id, safe to hand to the hosted checkout overlay.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.inner.key_id
    }

    /// Create a gateway order.
    ///
    /// # Arguments
    ///
    /// * `amount` - Amount in the smallest currency unit (paise)
    /// * `currency` - ISO 4217 code (e.g., "INR")
    /// * `receipt` - Merchant-side reference string
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Http` if the request fails or the response
    /// body cannot be parsed, and `GatewayError::Api` if Razorpay rejects
    /// the order.
    #[instrument(skip(self))]
    pub async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, GatewayError> {
        let url = format!("{}/v1/orders", self.inner.api_url);

        let response = self
            .inner
            .client
            .post(&url)
            .basic_auth(&self.inner.key_id, Some(&self.inner.key_secret))
            .json(&CreateOrderRequest {
                amount,
                currency,
                receipt,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error.description,
                Err(_) => "no error details provided".to_string(),
            };
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<GatewayOrder>().await?)
    }
}
