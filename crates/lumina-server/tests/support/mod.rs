#![allow(dead_code)]

use lumina_model::Email;
use lumina_payments::{FakeGateway, PaymentGateway};
use lumina_server::{build_router, AppState, Config};
use lumina_store::Store;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub const BOOTSTRAP_ADMIN: &str = "admin@lumina.com";

pub struct TestApp {
    pub addr: SocketAddr,
    pub store: Store,
    pub gateway: Arc<FakeGateway>,
}

/// Serves the real router on an ephemeral port against a scratch store and
/// the in-memory payment gateway.
pub async fn spawn_app() -> TestApp {
    let store = Store::open_in_memory().expect("open store");
    let gateway = Arc::new(FakeGateway::new());
    let config = Config {
        jwt_secret: "test-secret".to_string(),
        bootstrap_admin_email: Some(Email::parse(BOOTSTRAP_ADMIN).expect("admin email")),
        ..Config::default()
    };
    let payments: Arc<dyn PaymentGateway> = gateway.clone();
    let state = AppState::new(store.clone(), payments, config);
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    TestApp {
        addr,
        store,
        gateway,
    }
}

/// One raw HTTP round trip; returns status, response head, and the body
/// parsed as JSON (`Null` when empty or not JSON).
pub async fn send(
    addr: SocketAddr,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<&Value>,
) -> (u16, String, Value) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect");
    let payload = body.map(Value::to_string).unwrap_or_default();
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    if let Some(token) = token {
        req.push_str(&format!("Authorization: Bearer {token}\r\n"));
    }
    if body.is_some() {
        req.push_str("Content-Type: application/json\r\n");
    }
    req.push_str(&format!("Content-Length: {}\r\n\r\n{payload}", payload.len()));
    stream.write_all(req.as_bytes()).await.expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    let json = serde_json::from_str(body).unwrap_or(Value::Null);
    (status, head.to_string(), json)
}

pub async fn get(app: &TestApp, path: &str, token: Option<&str>) -> (u16, Value) {
    let (status, _, body) = send(app.addr, "GET", path, token, None).await;
    (status, body)
}

pub async fn post(
    app: &TestApp,
    path: &str,
    token: Option<&str>,
    body: Value,
) -> (u16, Value) {
    let (status, _, json) = send(app.addr, "POST", path, token, Some(&body)).await;
    (status, json)
}

/// Signs up a fresh account and returns its token.
pub async fn signup(app: &TestApp, name: &str, email: &str, password: &str) -> String {
    let (status, body) = post(
        app,
        "/api/auth/signup",
        None,
        json!({"name": name, "email": email, "password": password}),
    )
    .await;
    assert_eq!(status, 201, "signup failed: {body}");
    body["token"].as_str().expect("token").to_string()
}

/// Token for the env-designated bootstrap admin account.
pub async fn signup_admin(app: &TestApp) -> String {
    signup(app, "Admin", BOOTSTRAP_ADMIN, "adminpw123").await
}

/// Creates a book through the admin surface and returns its id.
pub async fn create_book(app: &TestApp, admin_token: &str, body: Value) -> String {
    let (status, book) = post(app, "/api/books", Some(admin_token), body).await;
    assert_eq!(status, 201, "create book failed: {book}");
    book["id"].as_str().expect("book id").to_string()
}

pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}
