//! Checkout and direct purchase flows over the real router.

use axum::http::StatusCode;
use serde_json::json;

use sundry_integration_tests::{TestContext, bare_request, body_json, json_request, login, send};

#[tokio::test]
async fn checkout_converts_the_cart_into_history() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    ctx.create_user("ada", 100).await;
    let tea = ctx.create_product("Oolong Tea", 20, 10).await;
    let book = ctx.create_product("Field Guide", 30, 4).await;
    let cookie = login(&router, "ada").await;

    for (product, quantity) in [(&tea, 2), (&book, 1)] {
        let response = send(
            &router,
            json_request(
                "POST",
                "/cart/lines",
                Some(&cookie),
                &json!({ "product_id": product.id, "quantity": quantity }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = send(&router, bare_request("POST", "/cart/checkout", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let receipts = body_json(response).await;
    assert_eq!(receipts.as_array().expect("receipts").len(), 2);

    // Balance reflects the debit, the cart is empty, history is populated.
    let response = send(&router, bare_request("GET", "/account", Some(&cookie))).await;
    assert_eq!(body_json(response).await["balance"], 100 - 40 - 30);

    let response = send(&router, bare_request("GET", "/cart", Some(&cookie))).await;
    assert_eq!(body_json(response).await["lines"].as_array().expect("lines").len(), 0);

    let response = send(
        &router,
        bare_request("GET", "/account/transactions", Some(&cookie)),
    )
    .await;
    assert_eq!(body_json(response).await.as_array().expect("history").len(), 2);

    // Stock went down on the shelf.
    let response = send(&router, bare_request("GET", &format!("/products/{}", tea.id), None)).await;
    assert_eq!(body_json(response).await["stock"], 8);
}

#[tokio::test]
async fn checkout_with_empty_cart_is_rejected() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    ctx.create_user("ada", 100).await;
    let cookie = login(&router, "ada").await;

    let response = send(&router, bare_request("POST", "/cart/checkout", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "empty_cart");
}

#[tokio::test]
async fn checkout_reports_the_exact_shortfall() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    ctx.create_user("ada", 50).await;
    let tea = ctx.create_product("Oolong Tea", 20, 10).await;
    let cookie = login(&router, "ada").await;

    let response = send(
        &router,
        json_request(
            "POST",
            "/cart/lines",
            Some(&cookie),
            &json!({ "product_id": tea.id, "quantity": 3 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&router, bare_request("POST", "/cart/checkout", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "insufficient_funds");
    assert_eq!(body["shortfall"], 10);

    // Nothing moved: balance, stock and the cart are untouched.
    let response = send(&router, bare_request("GET", "/account", Some(&cookie))).await;
    assert_eq!(body_json(response).await["balance"], 50);
    let response = send(&router, bare_request("GET", &format!("/products/{}", tea.id), None)).await;
    assert_eq!(body_json(response).await["stock"], 10);
    let response = send(&router, bare_request("GET", "/cart", Some(&cookie))).await;
    assert_eq!(body_json(response).await["lines"].as_array().expect("lines").len(), 1);
}

#[tokio::test]
async fn checkout_short_stock_rolls_back_the_debit() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    ctx.create_user("ada", 1000).await;
    let scarce = ctx.create_product("Rare Print", 10, 2).await;
    let cookie = login(&router, "ada").await;

    let response = send(
        &router,
        json_request(
            "POST",
            "/cart/lines",
            Some(&cookie),
            &json!({ "product_id": scarce.id, "quantity": 5 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&router, bare_request("POST", "/cart/checkout", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"], "insufficient_stock");
    assert_eq!(body["available"], 2);

    // No partial debit persists.
    let response = send(&router, bare_request("GET", "/account", Some(&cookie))).await;
    assert_eq!(body_json(response).await["balance"], 1000);
}

#[tokio::test]
async fn buy_item_debits_decrements_and_records() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    ctx.create_user("ada", 100).await;
    let tea = ctx.create_product("Oolong Tea", 20, 10).await;
    let cookie = login(&router, "ada").await;

    let response = send(
        &router,
        json_request(
            "POST",
            &format!("/products/{}/buy", tea.id),
            Some(&cookie),
            &json!({ "quantity": 4 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let record = body_json(response).await;
    assert_eq!(record["amount"], 4);
    assert_eq!(record["total"], 80);

    let response = send(&router, bare_request("GET", "/account", Some(&cookie))).await;
    assert_eq!(body_json(response).await["balance"], 20);
    let response = send(&router, bare_request("GET", &format!("/products/{}", tea.id), None)).await;
    assert_eq!(body_json(response).await["stock"], 6);
}

#[tokio::test]
async fn buy_item_insufficient_funds() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    ctx.create_user("ada", 10).await;
    let tea = ctx.create_product("Oolong Tea", 20, 10).await;
    let cookie = login(&router, "ada").await;

    let response = send(
        &router,
        json_request(
            "POST",
            &format!("/products/{}/buy", tea.id),
            Some(&cookie),
            &json!({ "quantity": 2 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body_json(response).await["shortfall"], 30);
}
