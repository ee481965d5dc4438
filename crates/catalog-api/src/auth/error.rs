//! 인증/인가 에러와 HTTP 응답 매핑.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ApiErrorResponse;

/// 인증/인가 에러.
///
/// 모든 변형은 요청을 종료시키며 재시도나 부분 인증은 없습니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// 로그인 요청의 Authorization 헤더가 없거나 Basic 형식이 아님
    #[error("Basic 인증 헤더가 필요합니다")]
    MalformedAuthHeader,
    /// 사용자 없음 또는 비밀번호 불일치 (구분하지 않음)
    #[error("잘못된 사용자명 또는 비밀번호")]
    InvalidCredentials,
    /// 토큰 서명 불일치, 형식 오류, 만료 (구분하지 않음)
    #[error("유효하지 않은 토큰")]
    TokenInvalid,
    /// 인증 주체 없음
    #[error("인증이 필요합니다")]
    Unauthorized,
    /// 역할 부족
    #[error("권한이 부족합니다")]
    Forbidden,
    /// 저장소/해셔 장애
    #[error("인증 서비스를 사용할 수 없습니다")]
    Unavailable,
}

impl AuthError {
    /// 기본 HTTP 상태 코드.
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MalformedAuthHeader
            | AuthError::TokenInvalid
            | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::InvalidCredentials | AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Unavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 에러 코드.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MalformedAuthHeader => "MALFORMED_AUTH_HEADER",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::TokenInvalid => "INVALID_TOKEN",
            AuthError::Unauthorized => "UNAUTHORIZED",
            AuthError::Forbidden => "FORBIDDEN",
            AuthError::Unavailable => "AUTH_UNAVAILABLE",
        }
    }

    /// 지정한 상태 코드로 응답 생성.
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        let body = Json(ApiErrorResponse::new(self.code(), self.to_string()));
        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            let scheme = match self {
                AuthError::MalformedAuthHeader | AuthError::InvalidCredentials => "Basic",
                _ => "Bearer",
            };
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static(scheme),
            );
        }
        response
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        self.into_response_with_status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AuthError::MalformedAuthHeader.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidCredentials.status(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::TokenInvalid.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::Unavailable.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_error_body() {
        let response = AuthError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "FORBIDDEN");
    }

    #[test]
    fn test_unauthorized_carries_challenge() {
        let response = AuthError::Unauthorized.into_response();
        assert_eq!(
            response.headers().get(axum::http::header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }
}
