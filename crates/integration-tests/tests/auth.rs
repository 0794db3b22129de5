//! Registration, login and session lifecycle over the real router.

use axum::http::StatusCode;
use serde_json::json;

use sundry_integration_tests::{
    TEST_PASSWORD, TestContext, bare_request, body_json, json_request, login, send,
    session_cookie,
};

#[tokio::test]
async fn register_then_login_and_fetch_profile() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;

    let response = send(
        &router,
        json_request(
            "POST",
            "/auth/register",
            None,
            &json!({
                "username": "ada",
                "email": "ada@example.com",
                "password": TEST_PASSWORD,
                "password_confirm": TEST_PASSWORD,
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["username"], "ada");
    assert_eq!(body["role"], "user");
    // Registration grants the signup balance but no session.
    assert_eq!(body["balance"], 10_000);

    let cookie = login(&router, "ada").await;

    let response = send(&router, bare_request("GET", "/account", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let profile = body_json(response).await;
    assert_eq!(profile["email"], "ada@example.com");
}

#[tokio::test]
async fn register_rejects_duplicates_and_bad_input() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    ctx.create_user("ada", 100).await;

    // Same username, different email.
    let response = send(
        &router,
        json_request(
            "POST",
            "/auth/register",
            None,
            &json!({
                "username": "ada",
                "email": "other@example.com",
                "password": TEST_PASSWORD,
                "password_confirm": TEST_PASSWORD,
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "username_taken");

    // Same email, different username.
    let response = send(
        &router,
        json_request(
            "POST",
            "/auth/register",
            None,
            &json!({
                "username": "grace",
                "email": "ada@example.com",
                "password": TEST_PASSWORD,
                "password_confirm": TEST_PASSWORD,
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "email_taken");

    // Mismatched confirmation.
    let response = send(
        &router,
        json_request(
            "POST",
            "/auth/register",
            None,
            &json!({
                "username": "grace",
                "email": "grace@example.com",
                "password": TEST_PASSWORD,
                "password_confirm": "something-else",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_rejects_wrong_credentials() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    ctx.create_user("ada", 100).await;

    let response = send(
        &router,
        json_request(
            "POST",
            "/auth/login",
            None,
            &json!({ "username": "ada", "password": "wrong-password" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Unknown users look exactly like wrong passwords.
    let response = send(
        &router,
        json_request(
            "POST",
            "/auth/login",
            None,
            &json!({ "username": "nobody", "password": TEST_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    ctx.create_user("ada", 100).await;
    let cookie = login(&router, "ada").await;

    let response = send(&router, bare_request("POST", "/auth/logout", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&router, bare_request("GET", "/account", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn password_change_forces_relogin() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    ctx.create_user("ada", 100).await;
    let cookie = login(&router, "ada").await;

    // Wrong old password is rejected.
    let response = send(
        &router,
        json_request(
            "POST",
            "/auth/password",
            Some(&cookie),
            &json!({
                "old_password": "not-it",
                "new_password": "next-password",
                "new_password_confirm": "next-password",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &router,
        json_request(
            "POST",
            "/auth/password",
            Some(&cookie),
            &json!({
                "old_password": TEST_PASSWORD,
                "new_password": "next-password",
                "new_password_confirm": "next-password",
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The old session is gone.
    let response = send(&router, bare_request("GET", "/account", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The new password works.
    let response = send(
        &router,
        json_request(
            "POST",
            "/auth/login",
            None,
            &json!({ "username": "ada", "password": "next-password" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).is_some());
}

#[tokio::test]
async fn profile_edit_updates_session_snapshot() {
    let ctx = TestContext::new().await;
    let router = ctx.router().await;
    ctx.create_user("ada", 100).await;
    let cookie = login(&router, "ada").await;

    let response = send(
        &router,
        json_request(
            "PUT",
            "/account",
            Some(&cookie),
            &json!({ "username": "ada_l", "email": "ada@newdomain.example" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "ada_l");

    // The session keeps working under the new name.
    let response = send(&router, bare_request("GET", "/account", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["username"], "ada_l");
}
