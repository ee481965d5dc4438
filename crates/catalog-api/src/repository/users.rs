//! Credential Store
//!
//! 사용자명으로 계정(해시된 비밀번호 + 역할)을 조회합니다.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tokio::sync::RwLock;
use tracing::warn;

use catalog_core::{Identity, Role};

use super::StoreError;

/// 계정 저장소.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 사용자명으로 계정 조회. 없으면 `None`.
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, StoreError>;

    /// 계정 존재 여부.
    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError>;

    /// 계정 저장 (같은 사용자명이면 덮어씀).
    async fn save(&self, identity: Identity) -> Result<(), StoreError>;
}

// ================================================================================================
// In-memory
// ================================================================================================

/// 메모리 기반 계정 저장소.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    accounts: RwLock<HashMap<String, Identity>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, StoreError> {
        Ok(self.accounts.read().await.get(username).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self.accounts.read().await.contains_key(username))
    }

    async fn save(&self, identity: Identity) -> Result<(), StoreError> {
        self.accounts
            .write()
            .await
            .insert(identity.username.clone(), identity);
        Ok(())
    }
}

// ================================================================================================
// PostgreSQL
// ================================================================================================

#[derive(Debug, FromRow)]
struct UserRow {
    username: String,
    password_hash: String,
    roles: Vec<String>,
}

impl From<UserRow> for Identity {
    fn from(row: UserRow) -> Self {
        let roles = row.roles.iter().filter_map(|label| {
            let role = Role::parse(label);
            if role.is_none() {
                warn!(username = %row.username, role = %label, "Skipping unknown role label");
            }
            role
        });
        Identity::new(row.username.clone(), row.password_hash.clone(), roles)
    }
}

/// PostgreSQL 계정 저장소.
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT username, password_hash, roles FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Identity::from))
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn save(&self, identity: Identity) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, roles)
            VALUES ($1, $2, $3)
            ON CONFLICT (username)
            DO UPDATE SET password_hash = EXCLUDED.password_hash, roles = EXCLUDED.roles
            "#,
        )
        .bind(&identity.username)
        .bind(&identity.password_hash)
        .bind(identity.role_labels())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_lookup() {
        let store = MemoryCredentialStore::new();
        assert!(store.find_by_username("admin").await.unwrap().is_none());
        assert!(!store.exists_by_username("admin").await.unwrap());

        store
            .save(Identity::new("admin", "hash", [Role::Admin, Role::User]))
            .await
            .unwrap();

        let found = store.find_by_username("admin").await.unwrap().unwrap();
        assert_eq!(found.username, "admin");
        assert!(found.roles.contains(&Role::Admin));
        assert!(store.exists_by_username("admin").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_store_lookup_is_case_sensitive() {
        let store = MemoryCredentialStore::new();
        store
            .save(Identity::new("admin", "hash", [Role::Admin]))
            .await
            .unwrap();

        assert!(store.find_by_username("Admin").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_save_overwrites() {
        let store = MemoryCredentialStore::new();
        store
            .save(Identity::new("user", "old", [Role::User]))
            .await
            .unwrap();
        store
            .save(Identity::new("user", "new", [Role::User, Role::Admin]))
            .await
            .unwrap();

        let found = store.find_by_username("user").await.unwrap().unwrap();
        assert_eq!(found.password_hash, "new");
        assert_eq!(found.roles.len(), 2);
    }

    #[test]
    fn test_user_row_skips_unknown_roles() {
        let row = UserRow {
            username: "admin".to_string(),
            password_hash: "hash".to_string(),
            roles: vec!["ADMIN".to_string(), "SUPERUSER".to_string(), "user".to_string()],
        };

        let identity = Identity::from(row);
        assert_eq!(
            identity.roles,
            [Role::Admin, Role::User].into_iter().collect()
        );
    }
}
