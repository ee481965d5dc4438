//! 인증 서비스 (사용자명/비밀번호 → 토큰 발급).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

use super::{PasswordError, PasswordHasher, TokenCodec};
use crate::metrics::record_login;
use crate::repository::CredentialStore;

/// 발급 토큰의 스킴 라벨.
pub const TOKEN_TYPE: &str = "Bearer";

/// 존재하지 않는 사용자에 대해서도 해시 검증 비용을 치르기 위한 평문.
const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-users";

/// 로그인 성공 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResult {
    /// 서명된 Bearer 토큰
    pub token: String,
    /// 사용자명
    pub username: String,
    /// 토큰 타입 (항상 "Bearer")
    pub token_type: String,
}

/// 인증 실패.
#[derive(Debug, thiserror::Error)]
pub enum AuthFailure {
    /// 사용자 없음 또는 비밀번호 불일치 (외부에 구분하여 노출하지 않음)
    #[error("잘못된 사용자명 또는 비밀번호")]
    InvalidCredentials,
    /// 저장소 조회 또는 토큰 발급 실패
    #[error("인증 처리 실패: {0}")]
    Unavailable(String),
}

/// 인증 서비스.
///
/// 로그인 시 부수 효과는 토큰 발급뿐입니다 (세션, 카운터, 잠금 없음).
#[derive(Clone)]
pub struct AuthenticationService {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    codec: Arc<TokenCodec>,
    dummy_hash: Arc<str>,
}

impl AuthenticationService {
    /// 새 인증 서비스 생성.
    ///
    /// 사용자 열거 방지용 더미 해시를 한 번 계산합니다.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        codec: Arc<TokenCodec>,
    ) -> Result<Self, PasswordError> {
        let dummy_hash = hasher.hash(DUMMY_PASSWORD)?;

        Ok(Self {
            store,
            hasher,
            codec,
            dummy_hash: Arc::from(dummy_hash),
        })
    }

    /// 현재 시각 기준으로 인증.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticationResult, AuthFailure> {
        self.authenticate_at(username, password, Utc::now()).await
    }

    /// 주어진 시각 기준으로 인증.
    pub async fn authenticate_at(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticationResult, AuthFailure> {
        let identity = self.store.find_by_username(username).await.map_err(|e| {
            error!(error = %e, "Credential store lookup failed");
            record_login("error");
            AuthFailure::Unavailable(e.to_string())
        })?;

        let identity = match identity {
            Some(identity) => identity,
            None => {
                // 존재하는 사용자와 같은 비용을 소모
                self.verify_password(password, self.dummy_hash.to_string())
                    .await?;
                return Err(self.reject(username, "unknown user"));
            }
        };

        let matches = self
            .verify_password(password, identity.password_hash.clone())
            .await?;
        if !matches {
            return Err(self.reject(username, "password mismatch"));
        }
        if !identity.is_usable() {
            return Err(self.reject(username, "account has no roles"));
        }

        let token = self
            .codec
            .mint(&identity.username, &identity.roles, now)
            .map_err(|e| {
                error!(error = %e, "Token minting failed");
                record_login("error");
                AuthFailure::Unavailable(e.to_string())
            })?;

        info!(username = %identity.username, roles = ?identity.roles, "Login succeeded");
        record_login("success");

        Ok(AuthenticationResult {
            token,
            username: identity.username,
            token_type: TOKEN_TYPE.to_string(),
        })
    }

    /// 해시 검증은 CPU 집약적이므로 blocking 스레드에서 수행.
    async fn verify_password(&self, password: &str, hash: String) -> Result<bool, AuthFailure> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| {
                error!(error = %e, "Password verification task failed");
                record_login("error");
                AuthFailure::Unavailable(e.to_string())
            })
    }

    fn reject(&self, username: &str, reason: &'static str) -> AuthFailure {
        warn!(username = %username, reason, "Login failed");
        record_login("failure");
        AuthFailure::InvalidCredentials
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Argon2PasswordHasher;
    use crate::repository::{MemoryCredentialStore, StoreError};
    use async_trait::async_trait;
    use catalog_core::{Identity, Role};
    use chrono::Duration;
    use secrecy::SecretString;

    fn codec() -> Arc<TokenCodec> {
        Arc::new(
            TokenCodec::new(
                &SecretString::from("test-secret-key-for-jwt-testing-minimum-32-chars"),
                Duration::hours(10),
            )
            .unwrap(),
        )
    }

    async fn service() -> AuthenticationService {
        let hasher = Arc::new(Argon2PasswordHasher::with_cost(1024, 1).unwrap());
        let store = MemoryCredentialStore::new();
        store
            .save(Identity::new(
                "admin",
                hasher.hash("admin123").unwrap(),
                [Role::Admin, Role::User],
            ))
            .await
            .unwrap();
        store
            .save(Identity::new("user", hasher.hash("user123").unwrap(), [Role::User]))
            .await
            .unwrap();
        store
            .save(Identity::new("ghost", hasher.hash("ghost123").unwrap(), []))
            .await
            .unwrap();

        AuthenticationService::new(Arc::new(store), hasher, codec()).unwrap()
    }

    #[tokio::test]
    async fn test_successful_login_round_trips_roles() {
        let service = service().await;
        let now = Utc::now();
        let result = service.authenticate_at("admin", "admin123", now).await.unwrap();

        assert_eq!(result.username, "admin");
        assert_eq!(result.token_type, "Bearer");

        let claims = codec().verify(&result.token, now + Duration::hours(1)).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.roles, [Role::Admin, Role::User].into_iter().collect());
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_are_indistinguishable() {
        let service = service().await;

        let wrong = service.authenticate("admin", "wrongpass").await.unwrap_err();
        let unknown = service.authenticate("nobody", "admin123").await.unwrap_err();

        assert!(matches!(wrong, AuthFailure::InvalidCredentials));
        assert!(matches!(unknown, AuthFailure::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_account_without_roles_cannot_login() {
        let service = service().await;
        let err = service.authenticate("ghost", "ghost123").await.unwrap_err();
        assert!(matches!(err, AuthFailure::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_password_containing_colon() {
        let hasher = Arc::new(Argon2PasswordHasher::with_cost(1024, 1).unwrap());
        let store = MemoryCredentialStore::new();
        store
            .save(Identity::new("colon", hasher.hash("a:b:c").unwrap(), [Role::User]))
            .await
            .unwrap();
        let service = AuthenticationService::new(Arc::new(store), hasher, codec()).unwrap();

        assert!(service.authenticate("colon", "a:b:c").await.is_ok());
    }

    struct FailingStore;

    #[async_trait]
    impl CredentialStore for FailingStore {
        async fn find_by_username(&self, _username: &str) -> Result<Option<Identity>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn exists_by_username(&self, _username: &str) -> Result<bool, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn save(&self, _identity: Identity) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_unavailable() {
        let hasher = Arc::new(Argon2PasswordHasher::with_cost(1024, 1).unwrap());
        let service = AuthenticationService::new(Arc::new(FailingStore), hasher, codec()).unwrap();

        let err = service.authenticate("admin", "admin123").await.unwrap_err();
        assert!(matches!(err, AuthFailure::Unavailable(_)));
    }
}
