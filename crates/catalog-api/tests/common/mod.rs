//! 통합 테스트 공용 헬퍼.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use secrecy::SecretString;
use tower::ServiceExt;

use catalog_api::auth::{Argon2PasswordHasher, PasswordHasher, TokenCodec};
use catalog_api::repository::{MemoryCredentialStore, MemoryProductStore};
use catalog_api::{create_router, seed, AppState};
use catalog_core::LoginFailureStatus;

pub const TEST_SECRET: &str = "integration-test-secret-key-at-least-32-bytes";

pub fn test_codec() -> TokenCodec {
    TokenCodec::new(
        &SecretString::from(TEST_SECRET),
        chrono::Duration::hours(10),
    )
    .unwrap()
}

/// 메모리 저장소 + 데모 계정 + 샘플 상품으로 구성된 앱 상태.
pub async fn test_state(login_failure_status: LoginFailureStatus) -> Arc<AppState> {
    let hasher: Arc<dyn PasswordHasher> =
        Arc::new(Argon2PasswordHasher::with_cost(1024, 1).unwrap());
    let state = AppState::new(
        test_codec(),
        Arc::new(MemoryCredentialStore::new()),
        Arc::new(MemoryProductStore::new()),
        hasher,
    )
    .unwrap()
    .with_login_failure_status(login_failure_status);

    seed::seed_demo_accounts(state.users.as_ref(), state.hasher.as_ref())
        .await
        .unwrap();
    seed::seed_sample_products(state.products.as_ref())
        .await
        .unwrap();

    Arc::new(state)
}

/// 전역으로 설치하지 않은 레코더의 핸들.
pub fn test_metrics_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}

pub async fn test_app() -> Router {
    create_router(
        test_state(LoginFailureStatus::Forbidden).await,
        test_metrics_handle(),
    )
}

pub fn basic(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// 요청 전송.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

pub async fn read_body(response: Response<Body>) -> (StatusCode, Vec<u8>) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

pub async fn read_json(response: Response<Body>) -> (StatusCode, serde_json::Value) {
    let (status, bytes) = read_body(response).await;
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// 로그인 후 토큰 반환.
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = send(
        app,
        Method::POST,
        "/api/auth/login",
        Some(&basic(username, password)),
        None,
    )
    .await;
    let (status, json) = read_json(response).await;
    assert_eq!(status, StatusCode::OK, "login failed for {}", username);
    json["token"].as_str().unwrap().to_string()
}
