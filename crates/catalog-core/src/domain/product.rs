//! 카탈로그 상품.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// 저장된 상품.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[cfg_attr(feature = "utoipa-support", schema(value_type = String, example = "1299.99"))]
    pub price: Decimal,
}

impl Product {
    /// 이름 또는 설명에 키워드가 포함되는지 확인 (대소문자 무시).
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.name.to_lowercase().contains(&keyword)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&keyword))
    }

    /// 이름에 부분 문자열이 포함되는지 확인 (대소문자 무시).
    pub fn name_contains(&self, fragment: &str) -> bool {
        self.name.to_lowercase().contains(&fragment.to_lowercase())
    }

    /// 설명에 부분 문자열이 포함되는지 확인 (대소문자 무시). 설명이 없으면 `false`.
    pub fn description_contains(&self, fragment: &str) -> bool {
        let fragment = fragment.to_lowercase();
        self.description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&fragment))
    }
}

/// 공백만으로 된 이름 거부
fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("Product name is required".into()));
    }
    Ok(())
}

/// 가격은 0보다 커야 함
fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(ValidationError::new("price_not_positive")
            .with_message("Price must be greater than zero".into()));
    }
    Ok(())
}

/// 상품 생성/수정 입력.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct NewProduct {
    #[validate(
        custom(function = "validate_not_blank"),
        length(min = 2, max = 100, message = "Product name must be between 2 and 100 characters")
    )]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_price"))]
    #[cfg_attr(feature = "utoipa-support", schema(value_type = String, example = "99.99"))]
    pub price: Decimal,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            price,
        }
    }

    /// 식별자를 부여하여 상품으로 변환.
    pub fn into_product(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
        }
    }
}
