//! 토큰 발급/검증.
//!
//! 토큰은 HS256 서명 JWT이며 `{sub, roles, iat, exp}`를 담습니다.
//! 서명과 만료 시각이 토큰 안에 포함되어 있어 서버 측 세션 저장소 없이 검증할 수 있습니다.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use catalog_core::{AuthConfig, Role, MAX_TOKEN_TTL_SECS, MIN_JWT_SECRET_LEN};

/// 토큰 페이로드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자명
    pub sub: String,
    /// 사용자 역할
    pub roles: BTreeSet<Role>,
    /// Issued At (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// 토큰 처리 에러.
///
/// 검증 실패는 원인(서명 불일치, 형식 오류, 만료)과 관계없이 `Invalid` 하나로 합쳐집니다.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("서명 키는 최소 {0}바이트 이상이어야 합니다")]
    WeakSecret(usize),
    #[error("토큰 유효 시간은 1초 이상 {max}초 이하여야 합니다", max = MAX_TOKEN_TTL_SECS)]
    InvalidTtl,
    #[error("토큰 만료 시각을 표현할 수 없습니다")]
    ExpiryOutOfRange,
    #[error("토큰 인코딩 실패: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
    #[error("유효하지 않은 토큰")]
    Invalid,
}

/// 토큰 코덱.
///
/// 서명 키는 생성 시 한 번 로드되고 이후 변경되지 않으므로 `Arc`로 여러 요청에서 공유합니다.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    /// 서명 키와 유효 시간으로 코덱 생성.
    pub fn new(secret: &SecretString, ttl: Duration) -> Result<Self, TokenError> {
        let secret = secret.expose_secret().as_bytes();
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(TokenError::WeakSecret(MIN_JWT_SECRET_LEN));
        }
        if ttl <= Duration::zero() || ttl.num_seconds() > MAX_TOKEN_TTL_SECS {
            return Err(TokenError::InvalidTtl);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // 만료는 주입된 시각으로 직접 검사
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    /// 인증 설정에서 코덱 생성.
    pub fn from_config(config: &AuthConfig) -> Result<Self, TokenError> {
        let ttl = Duration::try_seconds(config.token_ttl_secs).ok_or(TokenError::InvalidTtl)?;
        Self::new(&config.jwt_secret, ttl)
    }

    /// 토큰 유효 시간.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 토큰 발급.
    ///
    /// 같은 키와 같은 `now`에 대해 항상 같은 토큰을 생성합니다.
    pub fn mint(
        &self,
        username: &str,
        roles: &BTreeSet<Role>,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?;
        let claims = Claims {
            sub: username.to_string(),
            roles: roles.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(TokenError::from)
    }

    /// 토큰 검증.
    ///
    /// 서명 비교는 상수 시간으로 수행되며, `now >= exp`이면 거부합니다.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!(kind = ?e.kind(), "Token rejected");
            TokenError::Invalid
        })?;

        let claims = data.claims;
        if now.timestamp() >= claims.exp {
            debug!("Token rejected: expired");
            return Err(TokenError::Invalid);
        }
        if claims.sub.is_empty() {
            debug!("Token rejected: empty subject");
            return Err(TokenError::Invalid);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &"HS256")
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}
