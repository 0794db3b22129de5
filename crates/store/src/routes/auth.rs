//! Authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::Result;
use crate::middleware::{RequireUser, clear_current_user, set_current_user};
use crate::models::user::{CurrentUser, User};
use crate::services::account::AccountService;
use crate::state::AppState;

/// Registration payload.
#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

/// Password change payload.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordPayload {
    pub old_password: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

/// Create an account. Does not start a session; log in afterwards.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<User>)> {
    let user = AccountService::new(state.pool())
        .register(
            &payload.username,
            &payload.email,
            &payload.password,
            &payload.password_confirm,
        )
        .await?;

    tracing::info!(user_id = %user.id, "account registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Start a session.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<User>> {
    let user = AccountService::new(state.pool())
        .login(&payload.username, &payload.password)
        .await?;

    set_current_user(&session, &CurrentUser::from(&user)).await?;

    tracing::debug!(user_id = %user.id, "login");
    Ok(Json(user))
}

/// End the session.
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Change the password and end the session; the user logs in again with the
/// new password.
pub async fn change_password(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<StatusCode> {
    AccountService::new(state.pool())
        .change_password(
            user.id,
            &payload.old_password,
            &payload.new_password,
            &payload.new_password_confirm,
        )
        .await?;

    clear_current_user(&session).await?;

    tracing::info!(user_id = %user.id, "password changed");
    Ok(StatusCode::NO_CONTENT)
}
