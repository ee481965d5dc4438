//! 데모 계정 및 샘플 상품 초기화.

use rust_decimal_macros::dec;
use tracing::info;

use catalog_core::{Identity, NewProduct, Role};

use crate::auth::{PasswordError, PasswordHasher};
use crate::repository::{CredentialStore, ProductStore, StoreError};

/// 시드 실패.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// 데모 계정 생성 (이미 있으면 건너뜀).
///
/// - `admin` / `admin123` → ADMIN, USER
/// - `user` / `user123` → USER
pub async fn seed_demo_accounts(
    store: &dyn CredentialStore,
    hasher: &dyn PasswordHasher,
) -> Result<usize, SeedError> {
    let accounts: [(&str, &str, &[Role]); 2] = [
        ("admin", "admin123", &[Role::Admin, Role::User]),
        ("user", "user123", &[Role::User]),
    ];

    let mut created = 0;
    for (username, password, roles) in accounts {
        if store.exists_by_username(username).await? {
            continue;
        }

        let hash = hasher.hash(password)?;
        store
            .save(Identity::new(username, hash, roles.iter().copied()))
            .await?;
        info!(username, roles = ?roles, "Demo account created");
        created += 1;
    }

    Ok(created)
}

/// 카탈로그가 비어 있으면 샘플 상품 5종 추가.
pub async fn seed_sample_products(store: &dyn ProductStore) -> Result<usize, SeedError> {
    if store.count().await? > 0 {
        return Ok(0);
    }

    let samples = [
        NewProduct::new("Laptop", "High-performance laptop with 16GB RAM", dec!(1299.99)),
        NewProduct::new("Smartphone", "Latest model with 128GB storage", dec!(899.99)),
        NewProduct::new("Tablet", "10-inch tablet with retina display", dec!(499.99)),
        NewProduct::new("Headphones", "Noise-cancelling wireless headphones", dec!(199.99)),
        NewProduct::new("Smartwatch", "Fitness tracker with heart rate monitor", dec!(249.99)),
    ];

    let count = samples.len();
    for product in samples {
        store.insert(product).await?;
    }
    info!(count, "Sample products created");

    Ok(count)
}
