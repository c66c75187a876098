mod support;

use serde_json::json;
use support::{error_code, get, post, send, signup, signup_admin, spawn_app};

#[tokio::test]
async fn signup_returns_a_token_that_authenticates() {
    let app = spawn_app().await;
    let (status, body) = post(
        &app,
        "/api/auth/signup",
        None,
        json!({"name": "Ada", "email": "ada@x.com", "password": "pw123456"}),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(body["user"]["email"], "ada@x.com");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password_hash").is_none());

    let token = body["token"].as_str().expect("token");
    let (status, orders) = get(&app, "/api/orders/my-orders", Some(token)).await;
    assert_eq!(status, 200);
    assert_eq!(orders, json!([]));
}

#[tokio::test]
async fn signup_rejects_missing_fields_and_duplicates() {
    let app = spawn_app().await;
    for body in [
        json!({"email": "a@x.com", "password": "pw123456"}),
        json!({"name": "Ada", "password": "pw123456"}),
        json!({"name": "Ada", "email": "a@x.com"}),
        json!({"name": "", "email": "a@x.com", "password": "pw123456"}),
    ] {
        let (status, resp) = post(&app, "/api/auth/signup", None, body).await;
        assert_eq!(status, 400);
        assert_eq!(error_code(&resp), "ValidationFailed");
    }

    signup(&app, "Ada", "a@x.com", "pw123456").await;
    let (status, resp) = post(
        &app,
        "/api/auth/signup",
        None,
        json!({"name": "Eve", "email": "a@x.com", "password": "different"}),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(error_code(&resp), "EmailTaken");
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = spawn_app().await;
    signup(&app, "Ada", "a@x.com", "pw123456").await;

    let (status, ok) = post(
        &app,
        "/api/auth/login",
        None,
        json!({"email": "a@x.com", "password": "pw123456"}),
    )
    .await;
    assert_eq!(status, 200);
    assert!(ok["token"].as_str().is_some());
    assert_eq!(ok["user"]["name"], "Ada");

    let (wrong_pw_status, wrong_pw) = post(
        &app,
        "/api/auth/login",
        None,
        json!({"email": "a@x.com", "password": "nope"}),
    )
    .await;
    let (no_user_status, no_user) = post(
        &app,
        "/api/auth/login",
        None,
        json!({"email": "ghost@x.com", "password": "pw123456"}),
    )
    .await;
    assert_eq!(wrong_pw_status, 401);
    assert_eq!(no_user_status, 401);
    // Same error shape for both failure causes.
    assert_eq!(wrong_pw, no_user);
}

#[tokio::test]
async fn auth_gate_distinguishes_missing_from_invalid_tokens() {
    let app = spawn_app().await;
    let (status, resp) = get(&app, "/api/orders/my-orders", None).await;
    assert_eq!(status, 401);
    assert_eq!(error_code(&resp), "Unauthenticated");

    let (status, resp) = get(&app, "/api/orders/my-orders", Some("garbage.token.here")).await;
    assert_eq!(status, 400);
    assert_eq!(error_code(&resp), "InvalidToken");
}

#[tokio::test]
async fn bootstrap_admin_email_gets_the_admin_role() {
    let app = spawn_app().await;
    let (status, body) = post(
        &app,
        "/api/auth/signup",
        None,
        json!({"name": "Admin", "email": support::BOOTSTRAP_ADMIN, "password": "adminpw123"}),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(body["user"]["role"], "admin");
}

#[tokio::test]
async fn every_response_carries_a_request_id() {
    let app = spawn_app().await;
    let (status, head, _) = send(app.addr, "GET", "/healthz", None, None).await;
    assert_eq!(status, 200);
    assert!(
        head.to_ascii_lowercase().contains("x-request-id:"),
        "head was: {head}"
    );

    // Errors carry it too.
    let (_, head, _) = send(app.addr, "GET", "/api/orders/my-orders", None, None).await;
    assert!(head.to_ascii_lowercase().contains("x-request-id:"));
}

#[tokio::test]
async fn admin_survives_login_round_trip() {
    let app = spawn_app().await;
    signup_admin(&app).await;
    let (status, body) = post(
        &app,
        "/api/auth/login",
        None,
        json!({"email": support::BOOTSTRAP_ADMIN, "password": "adminpw123"}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["user"]["role"], "admin");
}
