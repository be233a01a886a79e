#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use warden::router::init_router;
use warden::state::AppState;
use warden_config::{CorsConfig, JwtConfig};
use warden_core::PasswordHasher;
use warden_db::{CredentialStore, InMemoryCredentialStore};

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-characters-long";
pub const TEST_PASSWORD: &str = "password123";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig::new(TEST_SECRET)
}

/// Lowest bcrypt cost keeps the suite fast.
pub fn test_hasher() -> PasswordHasher {
    PasswordHasher::new(4, 4)
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<InMemoryCredentialStore>,
}

pub fn setup_test_app() -> TestApp {
    let store = Arc::new(InMemoryCredentialStore::new());
    let state = state_with_store(store.clone());

    TestApp {
        router: init_router(state.clone()),
        state,
        store,
    }
}

pub fn state_with_store(store: Arc<dyn CredentialStore>) -> AppState {
    AppState::new(
        store,
        test_hasher(),
        &test_jwt_config(),
        CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        Duration::from_secs(30),
    )
}

pub fn generate_unique_email() -> String {
    let local: String = SafeEmail().fake();
    format!("{}-{}", uuid::Uuid::new_v4().simple(), local)
}

pub fn generate_name() -> String {
    let name: String = Name().fake();
    if name.trim().chars().count() < 2 {
        return "Test User".to_string();
    }
    name
}

pub fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn bearer_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn read_json(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Registers a fresh account and returns `(email, auth response body)`.
pub async fn register_user(app: &Router) -> (String, Value) {
    let email = generate_unique_email();
    let response = send(
        app,
        json_request(
            "POST",
            "/api/v1/auth/register",
            json!({
                "email": email,
                "password": TEST_PASSWORD,
                "name": generate_name(),
            }),
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    (email, read_json(response).await)
}
