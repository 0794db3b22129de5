//! Sundry Market store library.
//!
//! This crate provides the storefront and admin functionality as a library,
//! allowing it to be tested and reused. The [`router`] function builds the
//! full axum application; the `sundry-store` binary is a thin wrapper
//! around it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Build the application router.
///
/// The session layer is created separately (it needs async setup for the
/// session table) and applied by the caller:
///
/// ```rust,ignore
/// let session_layer = middleware::create_session_layer(state.pool(), state.config()).await?;
/// let app = sundry_store::router(state).layer(session_layer);
/// ```
#[must_use]
pub fn router(state: AppState) -> Router {
    let image_dir = state.config().image_dir.clone();

    Router::new()
        .merge(routes::routes())
        .nest_service("/static/images", ServeDir::new(image_dir))
        .with_state(state)
}
