//! Account route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::Result;
use crate::middleware::{RequireUser, set_current_user};
use crate::models::transaction::TransactionRecord;
use crate::models::user::{CurrentUser, User};
use crate::services::account::AccountService;
use crate::services::checkout::CheckoutService;
use crate::state::AppState;

/// Profile edit payload.
#[derive(Debug, Deserialize)]
pub struct UpdateProfilePayload {
    pub username: String,
    pub email: String,
}

/// Current user's profile, fetched fresh (balance changes between requests).
pub async fn profile(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<User>> {
    let user = AccountService::new(state.pool()).user(user.id).await?;
    Ok(Json(user))
}

/// Edit username/email. The session snapshot is refreshed so later requests
/// see the new name.
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<Json<User>> {
    let updated = AccountService::new(state.pool())
        .update_profile(user.id, &payload.username, &payload.email)
        .await?;

    set_current_user(&session, &CurrentUser::from(&updated)).await?;

    Ok(Json(updated))
}

/// The current user's purchase history, newest first.
pub async fn transactions(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<TransactionRecord>>> {
    let records = CheckoutService::new(state.pool()).transactions(user.id).await?;
    Ok(Json(records))
}
