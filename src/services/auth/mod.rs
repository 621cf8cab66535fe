//! 인증 서비스 모듈
//!
//! Google OAuth 2.0 로그인을 시작하고, 콜백을 처리하여 Identity Backend 세션으로 넘겨줍니다.
//! 외부 시스템(OAuth 프로바이더, Identity Backend)은 트레이트 뒤에 있으며
//! [`GoogleAuthService`]는 이 트레이트에만 의존합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::{AuthorizationInitiator, GoogleAuthService};
//!
//! // 동의 화면 URL (서명된 state 포함)
//! let url = initiator.consent_url()?;
//!
//! // 콜백 처리 (실패도 리다이렉트 위치로 귀결)
//! let outcome = google_auth.complete_callback(&query).await;
//! let location = outcome.location();
//! ```

pub mod authorization_initiator;
pub mod google_auth_service;
pub mod identity_backend;
pub mod oauth_provider;
pub mod oauth_state;
pub mod session_client;

#[cfg(test)]
pub mod stubs;

pub use authorization_initiator::*;
pub use google_auth_service::*;
pub use identity_backend::*;
pub use oauth_provider::*;
pub use oauth_state::*;
pub use session_client::*;
