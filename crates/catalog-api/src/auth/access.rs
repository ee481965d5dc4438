//! 접근 결정 (라우트별 역할 요구사항 검사).
//!
//! 각 라우트는 등록 시점에 [`RoleRequirement`]와 짝지어지며,
//! 라우팅 계층이 [`enforce_requirement`] 미들웨어를 통해 [`decide`]를 호출합니다.

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};
use tracing::info;

use catalog_core::Role;

use super::{AuthError, Principal, TokenRejected};
use crate::metrics::record_access_denied;

/// 라우트의 정적 역할 요구사항.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleRequirement {
    /// 인증된 주체면 누구나
    Authenticated,
    /// 특정 역할 보유 필요
    Role(Role),
}

impl std::fmt::Display for RoleRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoleRequirement::Authenticated => f.write_str("authenticated"),
            RoleRequirement::Role(role) => write!(f, "role:{}", role),
        }
    }
}

/// 접근 허용 여부 판단.
///
/// - `Authenticated` + 주체 없음 → `Unauthorized`
/// - `Role(r)` + (주체 없음 또는 `r` 미보유) → `Forbidden`
pub fn decide(requirement: RoleRequirement, principal: Option<&Principal>) -> Result<(), AuthError> {
    match (requirement, principal) {
        (RoleRequirement::Authenticated, None) => Err(AuthError::Unauthorized),
        (RoleRequirement::Authenticated, Some(_)) => Ok(()),
        (RoleRequirement::Role(_), None) => Err(AuthError::Forbidden),
        (RoleRequirement::Role(role), Some(p)) if !p.has_role(role) => Err(AuthError::Forbidden),
        (RoleRequirement::Role(_), Some(_)) => Ok(()),
    }
}

/// 요구사항을 검사하는 미들웨어.
///
/// 토큰이 제시되었으나 거부된 요청은 `Unauthorized` 대신 `TokenInvalid`로 응답합니다 (둘 다 401).
pub async fn enforce_requirement(
    State(requirement): State<RoleRequirement>,
    request: Request,
    next: Next,
) -> Response {
    let principal = request.extensions().get::<Principal>();

    match decide(requirement, principal) {
        Ok(()) => next.run(request).await,
        Err(err) => {
            let err = match err {
                AuthError::Unauthorized if request.extensions().get::<TokenRejected>().is_some() => {
                    AuthError::TokenInvalid
                }
                other => other,
            };

            info!(
                method = %request.method(),
                path = %request.uri().path(),
                requirement = %requirement,
                username = principal.map(|p| p.username.as_str()).unwrap_or("-"),
                code = err.code(),
                "Access denied"
            );
            record_access_denied(err.code());

            err.into_response()
        }
    }
}

/// 핸들러에 역할 요구사항을 결합.
///
/// ```rust,ignore
/// .route("/admin", secured(RoleRequirement::Role(Role::Admin), get(admin_only)))
/// ```
pub fn secured<S>(requirement: RoleRequirement, route: MethodRouter<S>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(middleware::from_fn_with_state(requirement, enforce_requirement))
}
