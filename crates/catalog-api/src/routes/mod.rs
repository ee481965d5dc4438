//! API 라우트.
//!
//! # 라우트 구조
//!
//! 공개:
//! - `GET /health` - 헬스 체크
//! - `POST /api/auth/login` - 로그인 (Basic → Bearer 토큰)
//! - `GET /api-docs/openapi.json` - OpenAPI 스펙
//!
//! 인증 필요 (`/api/**`, 그 외 전부):
//! - `/api/users` - 현재 사용자, 역할 확인
//! - `/api/products` - 상품 카탈로그 (변경은 ADMIN)
//! - `GET /metrics` - Prometheus 메트릭 (ADMIN)

pub mod auth;
pub mod health;
pub mod products;
pub mod users;

pub use auth::{auth_router, parse_basic_credentials, BasicCredentials};
pub use health::{health_router, ComponentStatus, HealthResponse};
pub use products::{products_router, ProductQuery};
pub use users::{users_router, MeResponse};

use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use catalog_core::Role;

use crate::auth::{authenticate_request, enforce_requirement, secured, RoleRequirement};
use crate::openapi::openapi_router;
use crate::state::AppState;

/// `/api` 하위 라우터 생성.
///
/// 로그인을 제외한 모든 라우트는 인증된 주체를 요구합니다 (`route_layer`이므로
/// 매칭되지 않은 경로는 인증 여부와 관계없이 404).
pub fn create_api_router() -> Router<Arc<AppState>> {
    let protected = Router::new()
        .nest("/users", users_router())
        .nest("/products", products_router())
        .route_layer(middleware::from_fn_with_state(
            RoleRequirement::Authenticated,
            enforce_requirement,
        ));

    Router::new().nest("/auth", auth_router()).merge(protected)
}

/// `/metrics` 라우터 (ADMIN 전용).
pub fn metrics_router(handle: PrometheusHandle) -> Router<Arc<AppState>> {
    let render = get(move || {
        let handle = handle.clone();
        async move { handle.render() }
    });

    Router::new()
        .route("/metrics", secured(RoleRequirement::Role(Role::Admin), render))
        .route_layer(middleware::from_fn_with_state(
            RoleRequirement::Authenticated,
            enforce_requirement,
        ))
}

/// 전체 애플리케이션 라우터 생성.
///
/// 요청 인증 미들웨어가 모든 라우트 앞에서 Bearer 토큰을 검증합니다.
pub fn create_router(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let codec = Arc::clone(&state.codec);

    Router::new()
        .nest("/health", health_router())
        .nest("/api", create_api_router())
        .merge(metrics_router(metrics_handle))
        .merge(openapi_router())
        .layer(middleware::from_fn_with_state(codec, authenticate_request))
        .with_state(state)
}
