//! Repository pattern for database operations.
//!
//! 데이터 접근 로직을 라우트 핸들러에서 분리합니다.
//! 각 저장소는 trait로 정의되며 PostgreSQL 구현과 메모리 구현을 가집니다.

pub mod products;
pub mod users;

use sqlx::PgPool;

pub use products::{MemoryProductStore, PgProductStore, ProductStore};
pub use users::{CredentialStore, MemoryCredentialStore, PgCredentialStore};

/// 저장소 에러.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("데이터베이스 오류: {0}")]
    Database(#[from] sqlx::Error),

    #[error("저장소 사용 불가: {0}")]
    Unavailable(String),
}

/// 스키마 마이그레이션 실행.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
