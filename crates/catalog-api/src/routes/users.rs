//! 사용자 정보 및 역할 확인 endpoint.

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use catalog_core::Role;

use crate::auth::{secured, CurrentUser, RoleRequirement};
use crate::state::AppState;

/// 현재 사용자 정보.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    pub username: String,
    pub authorities: Vec<Role>,
}

/// 토큰에 담긴 신원 반환 (저장소를 조회하지 않음).
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "현재 사용자", body = MeResponse),
        (status = 401, description = "인증 필요")
    )
)]
pub async fn me(CurrentUser(principal): CurrentUser) -> Json<MeResponse> {
    Json(MeResponse {
        username: principal.username,
        authorities: principal.roles.into_iter().collect(),
    })
}

/// USER 역할 확인.
#[utoipa::path(
    get,
    path = "/api/users/user",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "USER 역할 보유", body = String),
        (status = 403, description = "역할 부족")
    )
)]
pub async fn user_access() -> &'static str {
    "Hello User! This endpoint is restricted to users with USER role."
}

/// ADMIN 역할 확인.
#[utoipa::path(
    get,
    path = "/api/users/admin",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "ADMIN 역할 보유", body = String),
        (status = 403, description = "역할 부족")
    )
)]
pub async fn admin_access() -> &'static str {
    "Hello Admin! This endpoint is restricted to users with ADMIN role."
}

/// 사용자 라우터 생성.
///
/// 인증 여부는 상위 라우터에서 검사하고, 여기서는 역할만 검사합니다.
pub fn users_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(me))
        .route(
            "/user",
            secured(RoleRequirement::Role(Role::User), get(user_access)),
        )
        .route(
            "/admin",
            secured(RoleRequirement::Role(Role::Admin), get(admin_access)),
        )
}
