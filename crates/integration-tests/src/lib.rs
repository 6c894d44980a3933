//! Integration tests for EcomShop.
//!
//! # Running Tests
//!
//! ```bash
//! # Logic-level tests (no external dependencies)
//! cargo test -p ecomshop-integration-tests
//!
//! # Live API tests (require a running server + database)
//! cargo run -p ecomshop-cli -- migrate
//! cargo run -p ecomshop-cli -- seed
//! cargo run -p ecomshop-api &
//! cargo test -p ecomshop-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `order_lifecycle` - Order state machine and snapshot invariants
//! - `api_shapes` - Wire-format compatibility with the SPA
//! - `storefront_flow` - Live end-to-end flows against a running server

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("ECOMSHOP_API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}
