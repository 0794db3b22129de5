//! Catalog browsing and the admin surface over the real router.

use axum::http::StatusCode;
use serde_json::json;

use sundry_core::UserId;
use sundry_integration_tests::{TestContext, bare_request, body_json, json_request, login, send};
use sundry_store::services::checkout::CheckoutService;

#[tokio::test]
async fn catalog_is_public_and_searchable() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    ctx.create_product("Oolong Tea", 12, 40).await;
    ctx.create_product("Green Tea", 10, 40).await;
    ctx.create_product("Chess Set", 30, 25).await;

    let response = send(&router, bare_request("GET", "/products", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().expect("products").len(), 3);

    // Substring match, case-insensitive.
    let response = send(&router, bare_request("GET", "/products/search?q=tea", None)).await;
    let found = body_json(response).await;
    assert_eq!(found.as_array().expect("matches").len(), 2);

    let response = send(&router, bare_request("GET", "/products/9999", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_surface_is_role_guarded() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    ctx.create_user("ada", 100).await;
    let cookie = login(&router, "ada").await;

    // Logged in but not an admin.
    let response = send(&router, bare_request("GET", "/admin/users", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Not logged in at all.
    let response = send(&router, bare_request("GET", "/admin/users", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_manages_products() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    ctx.create_admin("root").await;
    let cookie = login(&router, "root").await;

    let response = send(
        &router,
        json_request(
            "POST",
            "/admin/products",
            Some(&cookie),
            &json!({
                "name": "Oolong Tea",
                "description": "Loose-leaf, 100g tin.",
                "price": 12,
                "stock": 40,
                "category": "Food",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let product = body_json(response).await;
    let product_id = product["id"].as_i64().expect("product id");
    assert_eq!(product["image"], "default.png");

    // Duplicate name.
    let response = send(
        &router,
        json_request(
            "POST",
            "/admin/products",
            Some(&cookie),
            &json!({
                "name": "Oolong Tea",
                "description": "Another tin.",
                "price": 14,
                "stock": 10,
                "category": "Food",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "duplicate_name");

    // Negative price is rejected.
    let response = send(
        &router,
        json_request(
            "PUT",
            &format!("/admin/products/{product_id}"),
            Some(&cookie),
            &json!({
                "name": "Oolong Tea",
                "description": "Loose-leaf, 100g tin.",
                "price": -1,
                "stock": 40,
                "category": "Food",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Full-replace edit.
    let response = send(
        &router,
        json_request(
            "PUT",
            &format!("/admin/products/{product_id}"),
            Some(&cookie),
            &json!({
                "name": "Oolong Tea (Reserve)",
                "description": "Loose-leaf, 100g tin.",
                "price": 18,
                "stock": 35,
                "category": "Food",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["price"], 18);
    assert_eq!(updated["name"], "Oolong Tea (Reserve)");
}

#[tokio::test]
async fn admin_adjusts_roles_and_balances() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    ctx.create_admin("root").await;
    let ada = ctx.create_user("ada", 100).await;
    let cookie = login(&router, "root").await;

    let response = send(
        &router,
        json_request(
            "PUT",
            &format!("/admin/users/{}/balance", ada.id),
            Some(&cookie),
            &json!({ "balance": 5000 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["balance"], 5000);

    // Negative balances are rejected before touching the row.
    let response = send(
        &router,
        json_request(
            "PUT",
            &format!("/admin/users/{}/balance", ada.id),
            Some(&cookie),
            &json!({ "balance": -1 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &router,
        json_request(
            "PUT",
            &format!("/admin/users/{}/role", ada.id),
            Some(&cookie),
            &json!({ "role": "admin" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["role"], "admin");

    // Unknown user.
    let response = send(
        &router,
        json_request(
            "PUT",
            "/admin/users/9999/role",
            Some(&cookie),
            &json!({ "role": "admin" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_product_cascades_to_carts_and_history() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    ctx.create_admin("root").await;
    let ada = ctx.create_user("ada", 1000).await;
    let tea = ctx.create_product("Oolong Tea", 20, 10).await;
    let cookie = login(&router, "root").await;

    // Give the product both a cart line and a purchase record.
    let engine = CheckoutService::new(&ctx.pool);
    engine.buy_item(ada.id, tea.id, 1).await.expect("purchase");
    engine.add_to_cart(ada.id, tea.id, 2).await.expect("cart line");

    let response = send(
        &router,
        bare_request("DELETE", &format!("/admin/products/{}", tea.id), Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Cart lines and transaction history went with it.
    assert!(engine.cart(ada.id).await.expect("cart").lines.is_empty());
    assert!(engine.transactions(ada.id).await.expect("history").is_empty());

    let response = send(&router, bare_request("GET", &format!("/products/{}", tea.id), None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Deleting again: the product is already gone.
    let response = send(
        &router,
        bare_request("DELETE", &format!("/admin/products/{}", tea.id), Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_sees_every_user() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    ctx.create_admin("root").await;
    ctx.create_user("ada", 100).await;
    ctx.create_user("grace", 100).await;
    let cookie = login(&router, "root").await;

    let response = send(&router, bare_request("GET", "/admin/users", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let users = body_json(response).await;
    assert_eq!(users.as_array().expect("users").len(), 3);

    // Sanity: ids are the sequential rowids the fixtures created.
    let ids: Vec<UserId> = users
        .as_array()
        .expect("users")
        .iter()
        .map(|u| UserId::new(u["id"].as_i64().expect("id")))
        .collect();
    assert_eq!(ids.len(), 3);
}
