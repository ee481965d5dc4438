//! 요청 인증 미들웨어와 추출기.
//!
//! [`authenticate_request`]는 모든 라우트보다 먼저 실행되어 Bearer 토큰을 검증하고,
//! 성공하면 [`Principal`]을 요청 extensions에 부착합니다.
//! 실패해도 요청을 중단하지 않으므로 공개 라우트는 토큰 없이 동작합니다.
//! 보호된 라우트의 거부는 접근 결정 단계([`super::enforce_requirement`])에서 이루어집니다.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};

use super::{AuthError, Principal, TokenCodec};
use crate::metrics::record_token_rejection;

/// 토큰이 제시되었으나 검증에 실패했음을 나타내는 표식.
#[derive(Debug, Clone, Copy)]
pub struct TokenRejected;

/// `Authorization: Bearer <token>` 헤더에서 토큰 추출.
///
/// 스킴 이름은 대소문자를 구분하지 않습니다.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// 헤더의 Bearer 토큰을 검증하여 인증 주체 복원.
///
/// 토큰이 없으면 `Ok(None)`, 토큰이 있으나 거부되면 `Err(TokenInvalid)`.
pub fn resolve_principal(
    codec: &TokenCodec,
    headers: &HeaderMap,
    now: DateTime<Utc>,
) -> Result<Option<Principal>, AuthError> {
    let Some(token) = bearer_token(headers) else {
        return Ok(None);
    };

    codec
        .verify(token, now)
        .map(|claims| Some(Principal::from(claims)))
        .map_err(|_| AuthError::TokenInvalid)
}

/// 요청 인증 미들웨어.
///
/// 자격증명 저장소를 조회하지 않고 토큰 서명만으로 신원을 신뢰합니다.
pub async fn authenticate_request(
    State(codec): State<Arc<TokenCodec>>,
    mut request: Request,
    next: Next,
) -> Response {
    match resolve_principal(&codec, request.headers(), Utc::now()) {
        Ok(Some(principal)) => {
            tracing::debug!(username = %principal.username, "Request authenticated");
            request.extensions_mut().insert(principal);
        }
        Ok(None) => {}
        Err(_) => {
            record_token_rejection();
            request.extensions_mut().insert(TokenRejected);
        }
    }

    next.run(request).await
}

/// 인증된 주체 추출기.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn me(CurrentUser(principal): CurrentUser) -> impl IntoResponse {
///     format!("Authenticated user: {}", principal.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Principal);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Principal>() {
            Some(principal) => Ok(CurrentUser(principal.clone())),
            None if parts.extensions.get::<TokenRejected>().is_some() => {
                Err(AuthError::TokenInvalid)
            }
            None => Err(AuthError::Unauthorized),
        }
    }
}
