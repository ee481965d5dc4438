//! 토큰 인증 기반 상품 카탈로그 REST API.
//!
//! # 모듈 구성
//!
//! - [`auth`]: 토큰 발급/검증, 비밀번호 해싱, 요청 인증, 역할 기반 접근 결정
//! - [`repository`]: 계정/상품 저장소 (PostgreSQL, 메모리)
//! - [`routes`]: REST API 엔드포인트
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`seed`]: 데모 계정 및 샘플 상품 초기화
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어
//! - [`openapi`]: OpenAPI 문서

pub mod auth;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod seed;
pub mod state;

pub use auth::{
    AuthError, AuthFailure, AuthenticationResult, AuthenticationService, Claims, Principal,
    RoleRequirement, TokenCodec,
};
pub use error::{ApiErrorResponse, ApiResult};
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use routes::{create_api_router, create_router, metrics_router};
pub use state::AppState;
