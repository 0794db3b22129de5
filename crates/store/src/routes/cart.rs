//! Cart and purchasing route handlers.
//!
//! Thin JSON wrappers over [`CheckoutService`]; all the interesting
//! semantics (replace-not-increment, all-or-nothing checkout) live there.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use sundry_core::{CartLineId, ProductId};

use crate::error::Result;
use crate::middleware::RequireUser;
use crate::models::cart::{CartLine, CartView};
use crate::models::transaction::TransactionRecord;
use crate::services::checkout::CheckoutService;
use crate::state::AppState;

/// Add-to-cart payload.
#[derive(Debug, Deserialize)]
pub struct AddToCartPayload {
    pub product_id: i64,
    pub quantity: i64,
}

/// Direct purchase payload.
#[derive(Debug, Deserialize)]
pub struct BuyPayload {
    pub quantity: i64,
}

/// The current user's cart with its running total.
pub async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<CartView>> {
    let cart = CheckoutService::new(state.pool()).cart(user.id).await?;
    Ok(Json(cart))
}

/// Put a product in the cart; re-adding replaces the quantity.
pub async fn add(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(payload): Json<AddToCartPayload>,
) -> Result<(StatusCode, Json<CartLine>)> {
    let line = CheckoutService::new(state.pool())
        .add_to_cart(user.id, ProductId::new(payload.product_id), payload.quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(line)))
}

/// Remove a cart line.
pub async fn remove(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    CheckoutService::new(state.pool())
        .remove_from_cart(user.id, CartLineId::new(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Convert the whole cart into purchases.
pub async fn checkout(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<TransactionRecord>>> {
    let receipts = CheckoutService::new(state.pool()).checkout(user.id).await?;
    Ok(Json(receipts))
}

/// Buy one product directly, bypassing the cart.
pub async fn buy(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
    Json(payload): Json<BuyPayload>,
) -> Result<(StatusCode, Json<TransactionRecord>)> {
    let record = CheckoutService::new(state.pool())
        .buy_item(user.id, ProductId::new(id), payload.quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}
