//! 비밀번호 해싱.
//!
//! Argon2id 기반 해싱 및 검증. 해시는 솔트와 파라미터가 포함된 PHC 문자열입니다.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use tracing::warn;

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("잘못된 Argon2 파라미터: {0}")]
    InvalidParams(String),
}

/// 단방향 비밀번호 해셔.
pub trait PasswordHasher: Send + Sync {
    /// 평문 비밀번호 해싱 (솔트 자동 생성).
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;

    /// 평문 비밀번호와 저장된 해시 비교.
    ///
    /// 해시 형식이 잘못된 경우에도 `false`를 반환합니다.
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

/// Argon2id 해셔.
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// 기본 파라미터(m=19456 KiB, t=2, p=1)로 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 메모리 비용(KiB)과 반복 횟수를 지정하여 생성.
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|_| PasswordError::HashingFailed)?;

        Ok(hash.to_string())
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("Stored password hash is not a valid PHC string");
                return false;
            }
        };

        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::with_cost(1024, 1).unwrap()
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hasher = hasher();
        let hash = hasher.hash("admin123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("admin123", &hash));
        assert!(!hasher.verify("wrongpass", &hash));
    }

    #[test]
    fn test_different_salts() {
        let hasher = hasher();
        let hash1 = hasher.hash("user123").unwrap();
        let hash2 = hasher.hash("user123").unwrap();

        assert_ne!(hash1, hash2);
        assert!(hasher.verify("user123", &hash1));
        assert!(hasher.verify("user123", &hash2));
    }

    #[test]
    fn test_malformed_hash_does_not_verify() {
        assert!(!hasher().verify("password", "not-a-valid-hash"));
        assert!(!hasher().verify("password", ""));
    }

    #[test]
    fn test_default_params_hash_verifies_with_cheap_hasher() {
        // 파라미터는 해시 문자열에 포함되므로 검증 측 비용 설정과 무관
        let hash = hasher().hash("p@ss:word").unwrap();
        assert!(Argon2PasswordHasher::new().verify("p@ss:word", &hash));
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(matches!(
            Argon2PasswordHasher::with_cost(1, 1),
            Err(PasswordError::InvalidParams(_))
        ));
    }
}
