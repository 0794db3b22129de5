//! Integration test harness for Sundry Market.
//!
//! Spins the whole application up against a single-connection in-memory
//! SQLite database: no external services, no network. Tests drive either
//! the service layer directly (via [`TestContext::pool`]) or the real axum
//! router with `tower::ServiceExt::oneshot`, carrying the session cookie
//! between requests like a browser would.

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use sundry_core::{Role, UserId};
use sundry_store::config::Config;
use sundry_store::db::MIGRATOR;
use sundry_store::db::users::UserRepository;
use sundry_store::middleware::create_session_layer;
use sundry_store::models::product::{NewProduct, Product};
use sundry_store::models::user::User;
use sundry_store::services::account::AccountService;
use sundry_store::services::catalog::CatalogService;
use sundry_store::state::AppState;

/// Password used for every fixture account.
pub const TEST_PASSWORD: &str = "correct-horse";

/// A fully wired application over an in-memory database.
pub struct TestContext {
    pub pool: SqlitePool,
    pub state: AppState,
}

impl TestContext {
    /// Create a fresh context with the schema applied.
    ///
    /// # Panics
    ///
    /// Panics when the in-memory database cannot be set up; tests cannot
    /// proceed without it.
    pub async fn new() -> Self {
        // One connection so every query sees the same in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        MIGRATOR.run(&pool).await.expect("migrations");

        let state = AppState::new(test_config(), pool.clone());

        Self { pool, state }
    }

    /// Build the full router, session layer included.
    ///
    /// # Panics
    ///
    /// Panics if the session table cannot be created.
    pub async fn router(&self) -> Router {
        let session_layer = create_session_layer(&self.pool, self.state.config())
            .await
            .expect("session layer");
        sundry_store::router(self.state.clone()).layer(session_layer)
    }

    /// Register a user with [`TEST_PASSWORD`] and the given balance.
    ///
    /// # Panics
    ///
    /// Panics on fixture setup failure.
    pub async fn create_user(&self, username: &str, balance: i64) -> User {
        let user = AccountService::new(&self.pool)
            .register(
                username,
                &format!("{username}@example.com"),
                TEST_PASSWORD,
                TEST_PASSWORD,
            )
            .await
            .expect("register fixture user");
        self.set_balance(user.id, balance).await
    }

    /// Register an admin with [`TEST_PASSWORD`].
    ///
    /// # Panics
    ///
    /// Panics on fixture setup failure.
    pub async fn create_admin(&self, username: &str) -> User {
        let user = self.create_user(username, 10_000).await;
        CatalogService::new(&self.pool)
            .set_role(user.id, Role::Admin)
            .await
            .expect("promote fixture admin")
    }

    /// Overwrite a user's balance directly.
    ///
    /// # Panics
    ///
    /// Panics on fixture setup failure.
    pub async fn set_balance(&self, user_id: UserId, balance: i64) -> User {
        UserRepository::new(&self.pool)
            .set_balance(user_id, balance)
            .await
            .expect("set fixture balance")
    }

    /// Create a product in the Food category.
    ///
    /// # Panics
    ///
    /// Panics on fixture setup failure.
    pub async fn create_product(&self, name: &str, price: i64, stock: i64) -> Product {
        CatalogService::new(&self.pool)
            .create_product(&NewProduct {
                name: name.to_owned(),
                description: format!("{name} (test fixture)"),
                price,
                stock,
                category: sundry_core::Category::Food,
            })
            .await
            .expect("create fixture product")
    }
}

/// Configuration pointing at nothing external.
fn test_config() -> Config {
    Config {
        database_url: SecretString::from("sqlite::memory:"),
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        secure_cookies: false,
        image_dir: std::env::temp_dir().join("sundry-test-images"),
    }
}

// =============================================================================
// HTTP helpers
// =============================================================================

/// Build a JSON request, optionally with a session cookie.
///
/// # Panics
///
/// Panics if the request cannot be built.
#[must_use]
pub fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request body")
}

/// Build a bodyless request, optionally with a session cookie.
///
/// # Panics
///
/// Panics if the request cannot be built.
#[must_use]
pub fn bare_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

/// Dispatch a request against a clone of the router.
///
/// # Panics
///
/// Panics if the service call itself fails (infallible in axum).
pub async fn send(router: &Router, request: Request<Body>) -> Response<axum::body::Body> {
    router.clone().oneshot(request).await.expect("router call")
}

/// Pull the `name=value` pair out of a response's Set-Cookie header.
#[must_use]
pub fn session_cookie(response: &Response<axum::body::Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .next()
        .map(str::to_owned)
}

/// Collect a response body as JSON.
///
/// # Panics
///
/// Panics if the body is not valid JSON.
pub async fn body_json(response: Response<axum::body::Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

/// Log a user in over HTTP and return the session cookie.
///
/// # Panics
///
/// Panics if login does not succeed.
pub async fn login(router: &Router, username: &str) -> String {
    let response = send(
        router,
        json_request(
            "POST",
            "/auth/login",
            None,
            &serde_json::json!({ "username": username, "password": TEST_PASSWORD }),
        ),
    )
    .await;
    assert!(
        response.status().is_success(),
        "login failed: {}",
        response.status()
    );
    session_cookie(&response).expect("session cookie")
}
