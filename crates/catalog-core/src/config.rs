//! 설정 관리.
//!
//! 기본값 → 설정 파일(선택) → 환경 변수 순으로 오버라이드하여
//! 애플리케이션 설정을 로드합니다.
//!
//! 환경 변수는 `CATALOG` 접두사와 `__` 구분자를 사용합니다.
//! 예: `CATALOG__AUTH__JWT_SECRET`, `CATALOG__SERVER__PORT`.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// 개발용 기본 서명 키. 운영 환경에서는 반드시 교체해야 합니다.
pub const DEV_JWT_SECRET: &str = "dev-secret-key-change-in-production-0123456789";

/// 서명 키 최소 길이 (바이트).
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// 토큰 유효 시간 상한 (초, 365일).
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 인증 설정
    #[serde(default)]
    pub auth: AuthConfig,
    /// 데이터베이스 설정
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 시드 데이터 설정
    #[serde(default)]
    pub seed: SeedConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 허용할 CORS origin 목록 (쉼표 구분). 없으면 모든 origin 허용.
    #[serde(default)]
    pub cors_origins: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origins: None,
        }
    }
}

/// 로그인 실패(잘못된 자격증명) 시 응답할 HTTP 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginFailureStatus {
    /// 403 - 기존 클라이언트와 호환되는 동작
    #[default]
    Forbidden,
    /// 401
    Unauthorized,
}

/// 인증 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// 토큰 서명 키 (HMAC-SHA256)
    pub jwt_secret: SecretString,
    /// 토큰 유효 시간 (초)
    pub token_ttl_secs: i64,
    /// 로그인 실패 응답 상태
    #[serde(default)]
    pub login_failure_status: LoginFailureStatus,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: SecretString::from(DEV_JWT_SECRET),
            token_ttl_secs: 36_000,
            login_failure_status: LoginFailureStatus::default(),
        }
    }
}

impl AuthConfig {
    /// 개발용 기본 서명 키를 사용 중인지 확인.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret.expose_secret() == DEV_JWT_SECRET
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL 연결 URL. 없으면 인메모리 저장소를 사용합니다.
    #[serde(default)]
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            connection_timeout_secs: 10,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "catalog_api=info,tower_http=debug".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 시드 데이터 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// 데모 계정(admin, user) 생성 여부
    pub demo_accounts: bool,
    /// 샘플 상품 생성 여부
    pub sample_products: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            demo_accounts: true,
            sample_products: true,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            seed: SeedConfig::default(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 설정 파일은 없어도 됩니다.
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("auth.jwt_secret", DEV_JWT_SECRET)?
            .set_default("auth.token_ttl_secs", 36_000)?
            .set_default("auth.login_failure_status", "forbidden")?
            .set_default("database.max_connections", 10)?
            .set_default("database.connection_timeout_secs", 10)?
            .set_default("logging.level", "catalog_api=info,tower_http=debug")?
            .set_default("logging.format", "pretty")?
            .set_default("seed.demo_accounts", true)?
            .set_default("seed.sample_products", true)?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("CATALOG")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> CoreResult<Self> {
        Self::load("config/default.toml")
    }

    /// 설정 값 검증.
    pub fn validate(&self) -> CoreResult<()> {
        if self.auth.jwt_secret.expose_secret().len() < MIN_JWT_SECRET_LEN {
            return Err(CoreError::Config(format!(
                "auth.jwt_secret must be at least {} bytes",
                MIN_JWT_SECRET_LEN
            )));
        }
        if self.auth.token_ttl_secs <= 0 || self.auth.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(CoreError::Config(format!(
                "auth.token_ttl_secs must be between 1 and {}",
                MAX_TOKEN_TTL_SECS
            )));
        }
        Ok(())
    }

    /// 소켓 바인딩 주소 문자열.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
