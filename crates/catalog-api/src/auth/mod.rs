//! 인증 및 권한 부여.
//!
//! 상태 없는(stateless) 토큰 기반 인증과 역할 기반 접근 제어를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`TokenCodec`]: 서명된 토큰 발급/검증 (HS256 JWT)
//! - [`PasswordHasher`]: 비밀번호 해싱 (Argon2id)
//! - [`AuthenticationService`]: 사용자명/비밀번호 → 토큰 발급
//! - [`authenticate_request`]: 요청마다 Bearer 토큰을 검증해 [`Principal`]을 요청에 부착
//! - [`RoleRequirement`] / [`decide`]: 라우트별 접근 허용 여부 판단
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! Router::new()
//!     .route("/admin", secured(RoleRequirement::Role(Role::Admin), get(admin_only)))
//!     .layer(middleware::from_fn_with_state(codec, authenticate_request));
//!
//! async fn admin_only(CurrentUser(principal): CurrentUser) -> String {
//!     format!("Hello, {}!", principal.username)
//! }
//! ```

mod access;
mod error;
mod middleware;
mod password;
mod principal;
mod service;
mod token;

pub use access::{decide, enforce_requirement, secured, RoleRequirement};
pub use error::AuthError;
pub use middleware::{
    authenticate_request, bearer_token, resolve_principal, CurrentUser, TokenRejected,
};
pub use password::{Argon2PasswordHasher, PasswordError, PasswordHasher};
pub use principal::Principal;
pub use service::{AuthFailure, AuthenticationResult, AuthenticationService, TOKEN_TYPE};
pub use token::{Claims, TokenCodec, TokenError};
