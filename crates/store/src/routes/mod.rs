//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (DB ping)
//!
//! # Auth
//! POST /auth/register           - Create an account
//! POST /auth/login              - Start a session
//! POST /auth/logout             - End the session
//! POST /auth/password           - Change password (ends the session)
//!
//! # Account (requires auth)
//! GET  /account                 - Profile
//! PUT  /account                 - Edit username/email
//! GET  /account/transactions    - Purchase history
//!
//! # Catalog (public)
//! GET  /products                - Product listing
//! GET  /products/{id}           - Product detail
//! GET  /products/search?q=      - Name search
//! POST /products/{id}/buy       - Direct purchase (requires auth)
//!
//! # Cart (requires auth)
//! GET    /cart                  - Cart with running total
//! POST   /cart/lines            - Add/replace a line
//! DELETE /cart/lines/{id}       - Remove a line
//! POST   /cart/checkout         - Convert the cart into purchases
//!
//! # Admin (requires admin role)
//! GET    /admin/users               - All users
//! PUT    /admin/users/{id}/role     - Change role
//! PUT    /admin/users/{id}/balance  - Adjust balance
//! POST   /admin/products            - Create product
//! PUT    /admin/products/{id}       - Edit product
//! DELETE /admin/products/{id}       - Delete product (cascades)
//! POST   /admin/products/{id}/image - Upload image (multipart)
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod products;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/password", post(auth::change_password))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::profile).put(account::update_profile))
        .route("/transactions", get(account::transactions))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/search", get(products::search))
        .route("/{id}", get(products::show))
        .route("/{id}/buy", post(cart::buy))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/lines", post(cart::add))
        .route("/lines/{id}", delete(cart::remove))
        .route("/checkout", post(cart::checkout))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/{id}/role", put(admin::set_role))
        .route("/users/{id}/balance", put(admin::set_balance))
        .route("/products", post(admin::create_product))
        .route(
            "/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/products/{id}/image", post(admin::upload_image))
}

/// Create all routes for the store.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/auth", auth_routes())
        .nest("/account", account_routes())
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/admin", admin_routes())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity; returns 503 when the pool is unusable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
