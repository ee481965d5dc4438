//! OpenAPI 문서화 설정.
//!
//! utoipa로 REST API의 OpenAPI 3 스펙을 생성하고 `/api-docs/openapi.json`에서 제공합니다.
//! 새 엔드포인트를 추가할 때는 핸들러에 `#[utoipa::path(...)]`를 붙이고
//! 아래 `paths(...)`와 `components(schemas(...))`에 등록합니다.

use axum::{routing::get, Json, Router};
use utoipa::openapi::security::{Http, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use catalog_core::{NewProduct, Product, Role};

use crate::auth::AuthenticationResult;
use crate::error::ApiErrorResponse;
use crate::routes::health::{ComponentStatus, HealthResponse};
use crate::routes::users::MeResponse;

/// Catalog API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        description = r#"
# 상품 카탈로그 REST API

## 인증

1. `POST /api/auth/login`에 `Authorization: Basic <base64(username:password)>` 헤더로 로그인
2. 응답의 `token`을 이후 요청에 `Authorization: Bearer <token>`으로 전달

상품 생성/수정/삭제에는 ADMIN 역할이 필요합니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "헬스 체크"),
        (name = "auth", description = "로그인 및 토큰 발급"),
        (name = "users", description = "현재 사용자 및 역할 확인"),
        (name = "products", description = "상품 카탈로그")
    ),
    components(
        schemas(
            ApiErrorResponse,
            AuthenticationResult,
            HealthResponse,
            ComponentStatus,
            MeResponse,
            Role,
            Product,
            NewProduct,
        )
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::auth::login,
        crate::routes::users::me,
        crate::routes::users::user_access,
        crate::routes::users::admin_access,
        crate::routes::products::list_products,
        crate::routes::products::get_product,
        crate::routes::products::get_product_by_name,
        crate::routes::products::create_product,
        crate::routes::products::update_product,
        crate::routes::products::delete_product,
    )
)]
pub struct ApiDoc;

/// `bearer_auth`, `basic_auth` 보안 스킴 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "basic_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
        );
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// `/api-docs/openapi.json` 라우터.
pub fn openapi_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}
