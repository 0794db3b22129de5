//! Cart maintenance over the real router.

use axum::http::StatusCode;
use serde_json::json;

use sundry_integration_tests::{TestContext, bare_request, body_json, json_request, login, send};

#[tokio::test]
async fn cart_requires_login() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;

    let response = send(&router, bare_request("GET", "/cart", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn re_adding_replaces_the_amount() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    ctx.create_user("ada", 1000).await;
    let tea = ctx.create_product("Oolong Tea", 20, 10).await;
    let cookie = login(&router, "ada").await;

    let add = |quantity: i64| {
        json_request(
            "POST",
            "/cart/lines",
            Some(&cookie),
            &json!({ "product_id": tea.id, "quantity": quantity }),
        )
    };

    let response = send(&router, add(3)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&router, add(5)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&router, bare_request("GET", "/cart", Some(&cookie))).await;
    let cart = body_json(response).await;
    let lines = cart["lines"].as_array().expect("lines array");
    assert_eq!(lines.len(), 1, "one line per (user, product) pair");
    assert_eq!(lines[0]["amount"], 5);
    assert_eq!(cart["total"], 100);
}

#[tokio::test]
async fn add_validates_quantity_and_product() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    ctx.create_user("ada", 1000).await;
    let tea = ctx.create_product("Oolong Tea", 20, 10).await;
    let cookie = login(&router, "ada").await;

    let response = send(
        &router,
        json_request(
            "POST",
            "/cart/lines",
            Some(&cookie),
            &json!({ "product_id": tea.id, "quantity": 0 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &router,
        json_request(
            "POST",
            "/cart/lines",
            Some(&cookie),
            &json!({ "product_id": 9999, "quantity": 1 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn removing_a_line_twice_reports_not_found() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    ctx.create_user("ada", 1000).await;
    let tea = ctx.create_product("Oolong Tea", 20, 10).await;
    let cookie = login(&router, "ada").await;

    let response = send(
        &router,
        json_request(
            "POST",
            "/cart/lines",
            Some(&cookie),
            &json!({ "product_id": tea.id, "quantity": 2 }),
        ),
    )
    .await;
    let line = body_json(response).await;
    let line_id = line["id"].as_i64().expect("line id");

    let uri = format!("/cart/lines/{line_id}");
    let response = send(&router, bare_request("DELETE", &uri, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Second delete is a no-op with a not-found signal.
    let response = send(&router, bare_request("DELETE", &uri, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&router, bare_request("GET", "/cart", Some(&cookie))).await;
    let cart = body_json(response).await;
    assert_eq!(cart["lines"].as_array().expect("lines").len(), 0);
}
