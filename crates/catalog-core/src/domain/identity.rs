//! 사용자 신원 및 역할.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 사용자 역할.
///
/// 토큰과 저장소에는 대문자 라벨(`ADMIN`, `USER`)로 기록됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// 관리자
    Admin,
    /// 일반 사용자
    User,
}

impl Role {
    /// 역할 라벨.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }

    /// 문자열에서 역할 파싱 (대소문자 무시, `ROLE_` 접두사 허용).
    pub fn parse(s: &str) -> Option<Self> {
        let label = s.trim();
        let label = label
            .strip_prefix("ROLE_")
            .or_else(|| label.strip_prefix("role_"))
            .unwrap_or(label);
        match label.to_ascii_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "USER" => Some(Role::User),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 저장된 사용자 신원.
///
/// 비밀번호 해시는 저장소 경계 밖으로 노출되지 않으므로
/// `Serialize`를 구현하지 않으며 `Debug` 출력에서도 가려집니다.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub password_hash: String,
    pub roles: BTreeSet<Role>,
}

impl Identity {
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            roles: roles.into_iter().collect(),
        }
    }

    /// 로그인 가능한 계정인지 확인 (사용자명과 역할이 비어 있지 않아야 함).
    pub fn is_usable(&self) -> bool {
        !self.username.is_empty() && !self.roles.is_empty()
    }

    /// 역할 라벨 목록 (저장소 기록용).
    pub fn role_labels(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.as_str().to_string()).collect()
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("roles", &self.roles)
            .finish()
    }
}
