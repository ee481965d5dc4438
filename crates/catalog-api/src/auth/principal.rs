//! 요청 범위 인증 주체.

use serde::Serialize;
use std::collections::BTreeSet;

use catalog_core::Role;

use super::Claims;

/// 검증된 토큰에서 복원한 인증 주체.
///
/// 요청의 extensions에만 존재하며 요청이 끝나면 함께 사라집니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub username: String,
    pub roles: BTreeSet<Role>,
}

impl Principal {
    pub fn new(username: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            username: username.into(),
            roles: roles.into_iter().collect(),
        }
    }

    /// 역할 보유 여부.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            roles: claims.roles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_claims() {
        let claims = Claims {
            sub: "admin".to_string(),
            roles: [Role::Admin, Role::User].into_iter().collect(),
            iat: 0,
            exp: 60,
        };
        let principal = Principal::from(claims);
        assert_eq!(principal.username, "admin");
        assert!(principal.has_role(Role::Admin));
        assert!(principal.has_role(Role::User));
    }

    #[test]
    fn test_has_role() {
        let principal = Principal::new("user", [Role::User]);
        assert!(principal.has_role(Role::User));
        assert!(!principal.has_role(Role::Admin));
    }
}
