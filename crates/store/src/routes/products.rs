//! Public catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use sundry_core::ProductId;

use crate::error::Result;
use crate::models::product::Product;
use crate::services::catalog::CatalogService;
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Name fragment to look for.
    pub q: String,
}

/// The whole catalog.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = CatalogService::new(state.pool()).list_products().await?;
    Ok(Json(products))
}

/// One product.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>> {
    let product = CatalogService::new(state.pool())
        .product(ProductId::new(id))
        .await?;
    Ok(Json(product))
}

/// Case-insensitive name search.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = CatalogService::new(state.pool())
        .search_products(&query.q)
        .await?;
    Ok(Json(products))
}
