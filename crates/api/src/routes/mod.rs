//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (verifies database)
//!
//! # Auth
//! POST /auth/register          - Create account, returns token + profile
//! POST /auth/login             - Password login, returns token + profile
//! GET  /auth/google            - Redirect to Google OAuth
//! GET  /auth/google/callback   - OAuth callback, redirects to the SPA
//! GET  /auth/me                - Caller profile (bearer)
//!
//! # Products
//! GET  /products               - Catalog listing
//! GET  /products/{id}          - Product detail
//!
//! # Cart (bearer)
//! GET    /cart                 - List the caller's items
//! POST   /cart                 - Add item
//! PATCH  /cart/{id}            - Update quantity
//! DELETE /cart/{id}            - Remove item
//! DELETE /cart                 - Clear
//!
//! # Orders (bearer)
//! POST /orders                 - Create gateway + local PENDING order
//! POST /orders/verify          - Mark the caller's order PAID
//! GET  /orders                 - Order history, newest first
//! ```

pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        // Google OAuth
        .route("/google", get(auth::google))
        .route("/google/callback", get(auth::google_callback))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::index).post(cart::add).delete(cart::clear))
        .route("/{id}", delete(cart::remove).patch(cart::update))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::index))
        .route("/verify", post(orders::verify))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
}
