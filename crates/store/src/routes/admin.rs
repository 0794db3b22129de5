//! Admin route handlers.
//!
//! Everything here sits behind [`RequireAdmin`]. Product deletion removes
//! the image file before touching the database - a failing removal blocks
//! the whole operation, matching the original system.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use sundry_core::{ProductId, Role, UserId};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::product::{NewProduct, Product, ProductChanges};
use crate::models::user::User;
use crate::services::catalog::CatalogService;
use crate::services::media;
use crate::state::AppState;

/// Role change payload.
#[derive(Debug, Deserialize)]
pub struct SetRolePayload {
    pub role: Role,
}

/// Balance adjustment payload.
#[derive(Debug, Deserialize)]
pub struct SetBalancePayload {
    pub balance: i64,
}

// =============================================================================
// User management
// =============================================================================

/// Every account, for the dashboard.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<Vec<User>>> {
    let users = CatalogService::new(state.pool()).list_users().await?;
    Ok(Json(users))
}

/// Change a user's role.
pub async fn set_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Json(payload): Json<SetRolePayload>,
) -> Result<Json<User>> {
    tracing::info!(admin = %admin.username, target = id, role = %payload.role, "admin role change");
    let user = CatalogService::new(state.pool())
        .set_role(UserId::new(id), payload.role)
        .await?;
    Ok(Json(user))
}

/// Overwrite a user's balance.
pub async fn set_balance(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Json(payload): Json<SetBalancePayload>,
) -> Result<Json<User>> {
    tracing::info!(admin = %admin.username, target = id, balance = payload.balance, "admin balance change");
    let user = CatalogService::new(state.pool())
        .set_balance(UserId::new(id), payload.balance)
        .await?;
    Ok(Json(user))
}

// =============================================================================
// Product management
// =============================================================================

/// Create a product.
pub async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(payload): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = CatalogService::new(state.pool())
        .create_product(&payload)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace a product's editable fields.
pub async fn update_product(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<i64>,
    Json(payload): Json<ProductChanges>,
) -> Result<Json<Product>> {
    let product = CatalogService::new(state.pool())
        .update_product(ProductId::new(id), &payload)
        .await?;
    Ok(Json(product))
}

/// Delete a product, its cart lines and its transaction history.
///
/// The image file goes first; an I/O failure there blocks the database
/// deletion entirely.
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let id = ProductId::new(id);
    let catalog = CatalogService::new(state.pool());

    let product = catalog.product(id).await?;
    media::remove_image(&state.config().image_dir, &product.image).await?;

    catalog.delete_product(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Upload a product image (multipart field `image`, `.png`/`.jpg`).
pub async fn upload_image(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<Product>> {
    let id = ProductId::new(id);
    let catalog = CatalogService::new(state.pool());

    // 404 before accepting the body.
    let product = catalog.product(id).await?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let original_name = field
            .file_name()
            .map(ToOwned::to_owned)
            .ok_or_else(|| AppError::BadRequest("image field has no filename".to_owned()))?;
        let filename = media::image_filename(id, &original_name)?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        media::save_image(&state.config().image_dir, &filename, &bytes).await?;

        // A previous upload with a different extension leaves a stale file.
        if product.has_image() && product.image != filename {
            media::remove_image_if_exists(&state.config().image_dir, &product.image).await?;
        }

        catalog.set_image(id, &filename).await?;

        let product = catalog.product(id).await?;
        return Ok(Json(product));
    }

    Err(AppError::BadRequest("missing image field".to_owned()))
}
