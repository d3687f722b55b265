//! End-to-end tests against the full router backed by in-memory SQLite.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use tower::Service;

use diary_api::config::AppConfig;
use diary_api::infrastructure::database::migrator::Migrator;
use diary_api::server::build_state;
use diary_api::{create_api_router, init_database, DatabaseConfig};

async fn app() -> Router {
    let config = AppConfig::from_lookup(|key| {
        match key {
            "DATABASE_URL" => Some("sqlite::memory:"),
            "JWT_PRIVATE_KEY" => Some("integration-secret"),
            "TOKEN_TTL" => Some("1800"),
            "BCRYPT_COST" => Some("4"),
            _ => None,
        }
        .map(str::to_string)
    })
    .unwrap();

    let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    create_api_router(build_state(&config, db))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let mut svc = app.clone().into_service();
    let resp = svc.call(request).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn register_and_login(app: &Router, username: &str, password: &str) -> String {
    let creds = json!({"username": username, "password": password});
    let (status, _) = send(app, "POST", "/auth/register", None, Some(creds.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(app, "POST", "/auth/login", None, Some(creds)).await;
    assert_eq!(status, StatusCode::OK);
    body["jwt"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn diary_round_trip() {
    let app = app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"username": "alice", "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user = &body["user"];
    assert_eq!(user["username"], "alice");
    assert!(user["ID"].as_i64().unwrap() > 0);
    assert_eq!(user["Entries"], json!([]));
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());

    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"username": "alice", "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let jwt = body["jwt"].as_str().unwrap().to_string();
    assert_eq!(jwt.split('.').count(), 3);

    let (status, body) = send(
        &app,
        "POST",
        "/api/entry",
        Some(&jwt),
        Some(json!({"content": "day one"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["content"], "day one");
    assert_eq!(body["data"]["UserID"], user["ID"]);
    let entry_id = body["data"]["ID"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", "/api/entry", Some(&jwt), None).await;
    assert_eq!(status, StatusCode::OK);
    let list = body["data"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["content"], "day one");

    let uri = format!("/api/entry/{}", entry_id);
    let (status, body) = send(&app, "GET", &uri, Some(&jwt), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entry"]["ID"], entry_id);

    let uri = format!("/api/entry/{}", entry_id + 100);
    let (status, body) = send(&app, "GET", &uri, Some(&jwt), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn entries_are_private_to_their_owner() {
    let app = app().await;
    let alice = register_and_login(&app, "alice", "secret123").await;
    let bob = register_and_login(&app, "bob", "hunter22").await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/entry",
        Some(&alice),
        Some(json!({"content": "alice only"})),
    )
    .await;
    let entry_id = body["data"]["ID"].as_i64().unwrap();

    let uri = format!("/api/entry/{}", entry_id);
    let (status, _) = send(&app, "GET", &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/api/entry", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn owner_field_in_payload_is_ignored() {
    let app = app().await;
    let alice = register_and_login(&app, "alice", "secret123").await;
    let (_, bob_body) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"username": "bob", "password": "hunter22"})),
    )
    .await;
    let bob_id = bob_body["user"]["ID"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/entry",
        Some(&alice),
        Some(json!({"content": "mine", "UserID": bob_id, "user_id": bob_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(body["data"]["UserID"].as_i64().unwrap(), bob_id);
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let app = app().await;
    let creds = json!({"username": "alice", "password": "secret123"});

    let (status, _) = send(&app, "POST", "/auth/register", None, Some(creds.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/auth/register", None, Some(creds)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn login_failures_are_bad_requests() {
    let app = app().await;
    register_and_login(&app, "alice", "secret123").await;

    let (status, _) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"username": "alice", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"username": "nobody", "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_payloads_are_bad_requests() {
    let app = app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"username": "alice"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "password: password is required");

    let token = register_and_login(&app, "carol", "pw").await;
    let (status, _) = send(&app, "POST", "/api/entry", Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/entry/abc", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/entry/-1", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = app().await;

    for (method, uri) in [("GET", "/api/entry"), ("POST", "/api/entry"), ("GET", "/api/entry/1")] {
        let (status, body) = send(&app, method, uri, None, Some(json!({"content": "x"}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(body["error"], "Authentication required");
    }

    let (status, _) = send(&app, "GET", "/api/entry", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_reports_database() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"]["status"], "ok");
}
