//! 로그인 endpoint.
//!
//! 로그인 교환에만 Basic 스킴을 사용하며, 이후 요청은 발급된 Bearer 토큰을 사용합니다.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::auth::{AuthError, AuthFailure, AuthenticationResult};
use crate::error::ApiErrorResponse;
use crate::state::AppState;

/// Basic 헤더에서 꺼낸 자격증명.
#[derive(Debug)]
pub struct BasicCredentials {
    pub username: String,
    pub password: SecretString,
}

/// `Authorization: Basic <base64(username:password)>` 파싱.
///
/// 첫 번째 콜론에서만 분리하므로 비밀번호에 콜론이 포함될 수 있습니다.
/// 헤더 누락, Basic 이외의 스킴, base64/UTF-8 오류, 콜론 누락은 모두 `MalformedAuthHeader`.
pub fn parse_basic_credentials(headers: &HeaderMap) -> Result<BasicCredentials, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MalformedAuthHeader)?;

    let (scheme, encoded) = value
        .split_once(' ')
        .ok_or(AuthError::MalformedAuthHeader)?;
    if !scheme.eq_ignore_ascii_case("Basic") {
        return Err(AuthError::MalformedAuthHeader);
    }

    let decoded = STANDARD.decode(encoded.trim()).map_err(|e| {
        debug!(error = %e, "Basic credentials are not valid base64");
        AuthError::MalformedAuthHeader
    })?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedAuthHeader)?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or(AuthError::MalformedAuthHeader)?;

    Ok(BasicCredentials {
        username: username.to_string(),
        password: SecretString::from(password.to_string()),
    })
}

/// 로그인.
///
/// 성공 시 `{token, username, tokenType}`을 반환합니다.
/// 자격증명 오류는 설정된 상태 코드(기본 403)로, 헤더 오류는 401로 응답합니다.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    security(("basic_auth" = [])),
    responses(
        (status = 200, description = "토큰 발급", body = AuthenticationResult),
        (status = 401, description = "Basic 헤더 누락/형식 오류", body = ApiErrorResponse),
        (status = 403, description = "잘못된 사용자명 또는 비밀번호", body = ApiErrorResponse),
        (status = 500, description = "인증 서비스 장애", body = ApiErrorResponse)
    )
)]
pub async fn login(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let credentials = match parse_basic_credentials(&headers) {
        Ok(credentials) => credentials,
        Err(err) => return err.into_response(),
    };

    match state
        .auth
        .authenticate(&credentials.username, credentials.password.expose_secret())
        .await
    {
        Ok(result) => Json(result).into_response(),
        Err(AuthFailure::InvalidCredentials) => AuthError::InvalidCredentials
            .into_response_with_status(state.login_failure_status),
        Err(AuthFailure::Unavailable(_)) => AuthError::Unavailable.into_response(),
    }
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new().route("/login", post(login))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn basic(raw: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Basic {}", STANDARD.encode(raw))).unwrap(),
        );
        headers
    }

    #[test]
    fn test_parse_basic_credentials() {
        let credentials = parse_basic_credentials(&basic("admin:admin123")).unwrap();
        assert_eq!(credentials.username, "admin");
        assert_eq!(credentials.password.expose_secret(), "admin123");
    }

    #[test]
    fn test_password_may_contain_colons() {
        let credentials = parse_basic_credentials(&basic("user:pa:ss:word")).unwrap();
        assert_eq!(credentials.username, "user");
        assert_eq!(credentials.password.expose_secret(), "pa:ss:word");
    }

    #[test]
    fn test_empty_password_is_parsed() {
        let credentials = parse_basic_credentials(&basic("user:")).unwrap();
        assert_eq!(credentials.password.expose_secret(), "");
    }

    #[test]
    fn test_malformed_headers() {
        assert_eq!(
            parse_basic_credentials(&HeaderMap::new()).unwrap_err(),
            AuthError::MalformedAuthHeader
        );

        let mut bearer = HeaderMap::new();
        bearer.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(
            parse_basic_credentials(&bearer).unwrap_err(),
            AuthError::MalformedAuthHeader
        );

        let mut bad_base64 = HeaderMap::new();
        bad_base64.insert(AUTHORIZATION, HeaderValue::from_static("Basic !!!not-base64"));
        assert_eq!(
            parse_basic_credentials(&bad_base64).unwrap_err(),
            AuthError::MalformedAuthHeader
        );

        assert_eq!(
            parse_basic_credentials(&basic("no-colon")).unwrap_err(),
            AuthError::MalformedAuthHeader
        );
    }

    #[test]
    fn test_debug_hides_password() {
        let credentials = parse_basic_credentials(&basic("admin:admin123")).unwrap();
        assert!(!format!("{:?}", credentials).contains("admin123"));
    }
}
