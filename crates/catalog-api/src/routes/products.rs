//! 상품 카탈로그 endpoint.
//!
//! 조회는 인증된 사용자 누구나, 생성/수정/삭제는 ADMIN만 가능합니다.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;
use validator::Validate;

use catalog_core::{NewProduct, Product, Role};

use crate::auth::{secured, CurrentUser, RoleRequirement};
use crate::error::{
    invalid_body, not_found, store_failure, validation_failure, ApiErrorResponse, ApiResult,
};
use crate::state::AppState;

/// 상품 목록 필터.
///
/// 하나의 필터만 적용되며 우선순위는
/// `keyword` > `name` > `description` > 가격 범위 > `min_price` > `max_price`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// 이름 부분 일치 (대소문자 무시)
    pub name: Option<String>,
    /// 설명 부분 일치 (대소문자 무시)
    pub description: Option<String>,
    /// 이름 또는 설명 키워드 (대소문자 무시)
    pub keyword: Option<String>,
    /// 최소 가격 (단독 사용 시 초과, 범위 사용 시 이상)
    #[param(value_type = Option<String>)]
    pub min_price: Option<Decimal>,
    /// 최대 가격 (단독 사용 시 미만, 범위 사용 시 이하)
    #[param(value_type = Option<String>)]
    pub max_price: Option<Decimal>,
}

/// 상품 목록 조회.
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "products",
    params(ProductQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "상품 목록", body = Vec<Product>),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    )
)]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProductQuery>,
) -> ApiResult<Json<Vec<Product>>> {
    let store = &state.products;

    let products = match query {
        ProductQuery {
            keyword: Some(keyword),
            ..
        } => store.search_by_keyword(&keyword).await,
        ProductQuery {
            name: Some(name), ..
        } => store.find_by_name_containing(&name).await,
        ProductQuery {
            description: Some(description),
            ..
        } => store.find_by_description_containing(&description).await,
        ProductQuery {
            min_price: Some(min),
            max_price: Some(max),
            ..
        } => store.find_by_price_range(min, max).await,
        ProductQuery {
            min_price: Some(min),
            ..
        } => store.find_by_price_greater_than(min).await,
        ProductQuery {
            max_price: Some(max),
            ..
        } => store.find_by_price_less_than(max).await,
        _ => store.find_all().await,
    }
    .map_err(store_failure)?;

    Ok(Json(products))
}

/// 상품 상세 조회.
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "상품 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "상품", body = Product),
        (status = 404, description = "상품 없음", body = ApiErrorResponse)
    )
)]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Product>> {
    state
        .products
        .find_by_id(id)
        .await
        .map_err(store_failure)?
        .map(Json)
        .ok_or_else(|| not_found(format!("상품을 찾을 수 없습니다: {}", id)))
}

/// 이름으로 상품 조회 (정확히 일치).
#[utoipa::path(
    get,
    path = "/api/products/by-name/{name}",
    tag = "products",
    params(("name" = String, Path, description = "상품 이름")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "상품", body = Product),
        (status = 404, description = "상품 없음", body = ApiErrorResponse)
    )
)]
pub async fn get_product_by_name(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<Product>> {
    state
        .products
        .find_by_name(&name)
        .await
        .map_err(store_failure)?
        .map(Json)
        .ok_or_else(|| not_found(format!("상품을 찾을 수 없습니다: {}", name)))
}

/// 상품 생성 (ADMIN).
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "products",
    request_body = NewProduct,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "생성됨", body = Product),
        (status = 400, description = "입력 검증 실패", body = ApiErrorResponse),
        (status = 403, description = "ADMIN 역할 필요", body = ApiErrorResponse)
    )
)]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let Json(input) = payload.map_err(invalid_body)?;
    input.validate().map_err(|e| validation_failure(&e))?;

    let product = state.products.insert(input).await.map_err(store_failure)?;
    info!(product_id = product.id, by = %principal.username, "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// 상품 수정 (ADMIN).
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "상품 ID")),
    request_body = NewProduct,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "수정됨", body = Product),
        (status = 400, description = "입력 검증 실패", body = ApiErrorResponse),
        (status = 403, description = "ADMIN 역할 필요", body = ApiErrorResponse),
        (status = 404, description = "상품 없음", body = ApiErrorResponse)
    )
)]
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let Json(input) = payload.map_err(invalid_body)?;
    input.validate().map_err(|e| validation_failure(&e))?;

    let product = state
        .products
        .update(id, input)
        .await
        .map_err(store_failure)?
        .ok_or_else(|| not_found(format!("상품을 찾을 수 없습니다: {}", id)))?;
    info!(product_id = id, by = %principal.username, "Product updated");

    Ok(Json(product))
}

/// 상품 삭제 (ADMIN).
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "상품 ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "삭제됨"),
        (status = 403, description = "ADMIN 역할 필요", body = ApiErrorResponse),
        (status = 404, description = "상품 없음", body = ApiErrorResponse)
    )
)]
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !state.products.delete(id).await.map_err(store_failure)? {
        return Err(not_found(format!("상품을 찾을 수 없습니다: {}", id)));
    }
    info!(product_id = id, by = %principal.username, "Product deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// 상품 라우터 생성.
pub fn products_router() -> Router<Arc<AppState>> {
    let admin = RoleRequirement::Role(Role::Admin);

    Router::new()
        .route(
            "/",
            get(list_products).merge(secured(admin, post(create_product))),
        )
        .route(
            "/{id}",
            get(get_product).merge(secured(
                admin,
                put(update_product).delete(delete_product),
            )),
        )
        .route("/by-name/{name}", get(get_product_by_name))
}
