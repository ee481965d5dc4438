//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.

use std::sync::Arc;

use axum::http::StatusCode;
use catalog_core::LoginFailureStatus;

use crate::auth::{AuthenticationService, PasswordError, PasswordHasher, TokenCodec};
use crate::repository::{CredentialStore, ProductStore};

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 로그인 처리 서비스
    pub auth: AuthenticationService,

    /// 토큰 검증기 (요청 인증 미들웨어가 사용)
    pub codec: Arc<TokenCodec>,

    /// 계정 저장소
    pub users: Arc<dyn CredentialStore>,

    /// 상품 저장소
    pub products: Arc<dyn ProductStore>,

    /// 비밀번호 해시 (시드 계정 생성용)
    pub hasher: Arc<dyn PasswordHasher>,

    /// 로그인 실패 시 응답 상태 코드
    pub login_failure_status: StatusCode,

    /// 데이터베이스 연결 풀 (없으면 메모리 저장소 사용 중)
    pub db_pool: Option<sqlx::PgPool>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    pub fn new(
        codec: TokenCodec,
        users: Arc<dyn CredentialStore>,
        products: Arc<dyn ProductStore>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Result<Self, PasswordError> {
        let codec = Arc::new(codec);
        let auth = AuthenticationService::new(
            Arc::clone(&users),
            Arc::clone(&hasher),
            Arc::clone(&codec),
        )?;

        Ok(Self {
            auth,
            codec,
            users,
            products,
            hasher,
            login_failure_status: StatusCode::FORBIDDEN,
            db_pool: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// 로그인 실패 상태 코드 설정.
    pub fn with_login_failure_status(mut self, status: LoginFailureStatus) -> Self {
        self.login_failure_status = match status {
            LoginFailureStatus::Forbidden => StatusCode::FORBIDDEN,
            LoginFailureStatus::Unauthorized => StatusCode::UNAUTHORIZED,
        };
        self
    }

    /// 데이터베이스 풀 설정.
    pub fn with_db_pool(mut self, pool: sqlx::PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// 저장소 종류 라벨.
    pub fn storage_label(&self) -> &'static str {
        if self.db_pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 데이터베이스 연결 상태 확인. 메모리 저장소는 항상 정상.
    pub async fn is_storage_healthy(&self) -> bool {
        match &self.db_pool {
            Some(pool) => sqlx::query("SELECT 1").fetch_one(pool).await.is_ok(),
            None => true,
        }
    }
}

/// 테스트용 AppState 생성 (메모리 저장소, 저비용 해시, 시드 데이터 포함).
#[cfg(test)]
pub async fn create_test_state() -> AppState {
    use crate::auth::Argon2PasswordHasher;
    use crate::repository::{MemoryCredentialStore, MemoryProductStore};
    use secrecy::SecretString;

    let codec = TokenCodec::new(
        &SecretString::from("test-secret-key-for-jwt-testing-minimum-32-chars"),
        chrono::Duration::hours(10),
    )
    .expect("test codec");
    let hasher: Arc<dyn PasswordHasher> =
        Arc::new(Argon2PasswordHasher::with_cost(1024, 1).expect("test hasher"));

    let state = AppState::new(
        codec,
        Arc::new(MemoryCredentialStore::new()),
        Arc::new(MemoryProductStore::new()),
        hasher,
    )
    .expect("test state");

    crate::seed::seed_demo_accounts(state.users.as_ref(), state.hasher.as_ref())
        .await
        .expect("seed accounts");
    crate::seed::seed_sample_products(state.products.as_ref())
        .await
        .expect("seed products");

    state
}
