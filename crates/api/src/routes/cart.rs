//! Cart route handlers.
//!
//! All operations are scoped to the authenticated caller; the repository
//! filters every query on the caller's id.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use ecomshop_core::{CartItemId, ProductId};

use crate::db::{CartRepository, ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::cart::CartItem;
use crate::state::AppState;

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: i32,
    pub quantity: Option<i32>,
}

/// Quantity-update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub quantity: i32,
}

/// List the caller's cart items.
///
/// # Route
///
/// `GET /cart`
///
/// # Errors
///
/// Returns 401 without a valid bearer token.
#[instrument(skip(state))]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<CartItem>>> {
    let items = CartRepository::new(state.pool()).list(user.id).await?;
    Ok(Json(items))
}

/// Add a product to the caller's cart.
///
/// Quantity defaults to 1. Each add creates a new cart line.
///
/// # Route
///
/// `POST /cart`
///
/// # Errors
///
/// Returns 400 for an unknown product or a quantity below 1.
#[instrument(skip(state))]
pub async fn add(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<AddToCartRequest>,
) -> Result<impl IntoResponse> {
    let quantity = body.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::BadRequest("Quantity must be at least 1".to_string()));
    }

    // Resolve the product first so an unknown id is a clean 400 rather than
    // a foreign-key error.
    let product_id = ProductId::new(body.product_id);
    ProductRepository::new(state.pool())
        .get(product_id)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("Unknown product {product_id}")))?;

    let item = CartRepository::new(state.pool())
        .add(user.id, product_id, quantity)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::BadRequest(format!("Unknown product {product_id}"))
            }
            other => AppError::Database(other),
        })?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// Update the quantity of one of the caller's cart items.
///
/// # Route
///
/// `PATCH /cart/{id}`
///
/// # Errors
///
/// Returns 400 for a quantity below 1, 404 when the item doesn't exist or
/// belongs to another user.
#[instrument(skip(state))]
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateCartRequest>,
) -> Result<Json<CartItem>> {
    if body.quantity < 1 {
        return Err(AppError::BadRequest("Quantity must be at least 1".to_string()));
    }

    let item = CartRepository::new(state.pool())
        .update_quantity(user.id, CartItemId::new(id), body.quantity)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::NotFound(format!("Cart item {id} not found"))
            }
            other => AppError::Database(other),
        })?;

    Ok(Json(item))
}

/// Remove one of the caller's cart items.
///
/// # Route
///
/// `DELETE /cart/{id}`
///
/// # Errors
///
/// Returns 404 when the item doesn't exist or belongs to another user.
#[instrument(skip(state))]
pub async fn remove(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let removed = CartRepository::new(state.pool())
        .remove(user.id, CartItemId::new(id))
        .await?;

    if !removed {
        return Err(AppError::NotFound(format!("Cart item {id} not found")));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Delete all of the caller's cart items.
///
/// # Route
///
/// `DELETE /cart`
///
/// # Errors
///
/// Returns 401 without a valid bearer token.
#[instrument(skip(state))]
pub async fn clear(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<StatusCode> {
    CartRepository::new(state.pool()).clear(user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
