//! Product Repository
//!
//! 상품 카탈로그 조회/변경 연산을 담당합니다.

use std::collections::BTreeMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tokio::sync::RwLock;

use catalog_core::{NewProduct, Product};

use super::StoreError;

/// 상품 저장소.
///
/// 목록 조회는 별도 언급이 없으면 id 오름차순입니다.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Product>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, StoreError>;

    /// 이름이 정확히 일치하는 첫 상품.
    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, StoreError>;

    async fn find_by_price_greater_than(&self, price: Decimal) -> Result<Vec<Product>, StoreError>;

    async fn find_by_price_less_than(&self, price: Decimal) -> Result<Vec<Product>, StoreError>;

    /// 이름 부분 일치 (대소문자 무시).
    async fn find_by_name_containing(&self, fragment: &str) -> Result<Vec<Product>, StoreError>;

    /// 설명 부분 일치 (대소문자 무시).
    async fn find_by_description_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<Product>, StoreError>;

    /// 가격 범위 (양 끝 포함), 가격 오름차순.
    async fn find_by_price_range(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> Result<Vec<Product>, StoreError>;

    /// 이름 또는 설명 키워드 검색 (대소문자 무시).
    async fn search_by_keyword(&self, keyword: &str) -> Result<Vec<Product>, StoreError>;

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError>;

    /// 존재하지 않으면 `None`.
    async fn update(&self, id: i64, product: NewProduct) -> Result<Option<Product>, StoreError>;

    /// 삭제 여부 반환.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;
}

// ================================================================================================
// In-memory
// ================================================================================================

#[derive(Debug, Default)]
struct Catalog {
    next_id: i64,
    products: BTreeMap<i64, Product>,
}

/// 메모리 기반 상품 저장소.
#[derive(Debug, Default)]
pub struct MemoryProductStore {
    inner: RwLock<Catalog>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn filter<F>(&self, predicate: F) -> Vec<Product>
    where
        F: Fn(&Product) -> bool + Send,
    {
        self.inner
            .read()
            .await
            .products
            .values()
            .filter(|p| predicate(p))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.filter(|_| true).await)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, StoreError> {
        Ok(self.inner.read().await.products.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, StoreError> {
        Ok(self.filter(|p| p.name == name).await.into_iter().next())
    }

    async fn find_by_price_greater_than(&self, price: Decimal) -> Result<Vec<Product>, StoreError> {
        Ok(self.filter(|p| p.price > price).await)
    }

    async fn find_by_price_less_than(&self, price: Decimal) -> Result<Vec<Product>, StoreError> {
        Ok(self.filter(|p| p.price < price).await)
    }

    async fn find_by_name_containing(&self, fragment: &str) -> Result<Vec<Product>, StoreError> {
        Ok(self.filter(|p| p.name_contains(fragment)).await)
    }

    async fn find_by_description_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<Product>, StoreError> {
        Ok(self.filter(|p| p.description_contains(fragment)).await)
    }

    async fn find_by_price_range(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> Result<Vec<Product>, StoreError> {
        let mut products = self.filter(|p| p.price >= min && p.price <= max).await;
        products.sort_by(|a, b| a.price.cmp(&b.price).then(a.id.cmp(&b.id)));
        Ok(products)
    }

    async fn search_by_keyword(&self, keyword: &str) -> Result<Vec<Product>, StoreError> {
        Ok(self.filter(|p| p.matches_keyword(keyword)).await)
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let mut catalog = self.inner.write().await;
        catalog.next_id += 1;
        let product = product.into_product(catalog.next_id);
        catalog.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(&self, id: i64, product: NewProduct) -> Result<Option<Product>, StoreError> {
        let mut catalog = self.inner.write().await;
        match catalog.products.get_mut(&id) {
            Some(existing) => {
                *existing = product.into_product(id);
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.products.remove(&id).is_some())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.inner.read().await.products.len() as i64)
    }
}

// ================================================================================================
// PostgreSQL
// ================================================================================================

const SELECT_PRODUCTS: &str = "SELECT id, name, description, price FROM products";

/// PostgreSQL 상품 저장소.
#[derive(Debug, Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// LIKE 패턴 특수문자 이스케이프 후 `%...%`로 감쌈.
fn like_pattern(fragment: &str) -> String {
    let escaped = fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let products = sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCTS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCTS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "{SELECT_PRODUCTS} WHERE name = $1 ORDER BY id LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn find_by_price_greater_than(&self, price: Decimal) -> Result<Vec<Product>, StoreError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "{SELECT_PRODUCTS} WHERE price > $1 ORDER BY id"
        ))
        .bind(price)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn find_by_price_less_than(&self, price: Decimal) -> Result<Vec<Product>, StoreError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "{SELECT_PRODUCTS} WHERE price < $1 ORDER BY id"
        ))
        .bind(price)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn find_by_name_containing(&self, fragment: &str) -> Result<Vec<Product>, StoreError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "{SELECT_PRODUCTS} WHERE name ILIKE $1 ORDER BY id"
        ))
        .bind(like_pattern(fragment))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn find_by_description_containing(
        &self,
        fragment: &str,
    ) -> Result<Vec<Product>, StoreError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "{SELECT_PRODUCTS} WHERE description ILIKE $1 ORDER BY id"
        ))
        .bind(like_pattern(fragment))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn find_by_price_range(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> Result<Vec<Product>, StoreError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "{SELECT_PRODUCTS} WHERE price BETWEEN $1 AND $2 ORDER BY price, id"
        ))
        .bind(min)
        .bind(max)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn search_by_keyword(&self, keyword: &str) -> Result<Vec<Product>, StoreError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "{SELECT_PRODUCTS} WHERE name ILIKE $1 OR description ILIKE $1 ORDER BY id"
        ))
        .bind(like_pattern(keyword))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, price
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    async fn update(&self, id: i64, product: NewProduct) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4
            WHERE id = $1
            RETURNING id, name, description, price
            "#,
        )
        .bind(id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
