//! OAuth 콜백 실패 분류
//!
//! 콜백 처리 중 발생하는 모든 실패는 [`CallbackFailure`]로 분류된 뒤
//! 닫힌 코드 집합 [`AuthErrorCode`] 중 하나로 브라우저에 전달됩니다.
//!
//! | 실패 | 코드 |
//! |------|------|
//! | `ProviderDenied` (`access_denied`) | `access_denied` |
//! | `ProviderDenied` (그 외) | `oauth_error` |
//! | `MissingCode` | `no_code` |
//! | `InvalidState`, `ExchangeFailure`, `MissingIdToken`, `IdentityFailure` | `auth_failed` |
//! | `SessionEstablishFailure` | `session_failed` |
//! | `Unexpected` | `callback_failed` |

use thiserror::Error;

/// 리다이렉트 URL의 `error` 매개변수로 전달되는 코드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorCode {
    AccessDenied,
    OAuthError,
    NoCode,
    AuthFailed,
    SessionFailed,
    CallbackFailed,
}

impl AuthErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthErrorCode::AccessDenied => "access_denied",
            AuthErrorCode::OAuthError => "oauth_error",
            AuthErrorCode::NoCode => "no_code",
            AuthErrorCode::AuthFailed => "auth_failed",
            AuthErrorCode::SessionFailed => "session_failed",
            AuthErrorCode::CallbackFailed => "callback_failed",
        }
    }

    /// 알려진 코드만 변환하며 그 외에는 `None`을 반환합니다.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "access_denied" => Some(AuthErrorCode::AccessDenied),
            "oauth_error" => Some(AuthErrorCode::OAuthError),
            "no_code" => Some(AuthErrorCode::NoCode),
            "auth_failed" => Some(AuthErrorCode::AuthFailed),
            "session_failed" => Some(AuthErrorCode::SessionFailed),
            "callback_failed" => Some(AuthErrorCode::CallbackFailed),
            _ => None,
        }
    }

    /// 사용자에게 보여줄 기본 문구
    pub fn default_message(&self) -> &'static str {
        match self {
            AuthErrorCode::AccessDenied => "Access was denied. Please try again.",
            AuthErrorCode::OAuthError => "The sign-in provider reported an error. Please try again.",
            AuthErrorCode::NoCode => "No authorization code was received. Please try again.",
            AuthErrorCode::AuthFailed => "Authentication failed. Please try again.",
            AuthErrorCode::SessionFailed => "We could not start your session. Please try again.",
            AuthErrorCode::CallbackFailed => "An unexpected error occurred during authentication.",
        }
    }
}

impl std::fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 콜백 상태 기계의 실패 종착 상태
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CallbackFailure {
    /// 프로바이더가 `error` 매개변수로 돌려보낸 경우
    #[error("provider returned error '{error}'")]
    ProviderDenied {
        error: String,
        description: Option<String>,
    },

    #[error("authorization code is missing")]
    MissingCode,

    /// `state`가 없거나 서명/만료 검증 실패
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// 토큰 교환 또는 사용자 정보 조회 실패
    #[error("code exchange failed: {0}")]
    ExchangeFailure(String),

    #[error("token response did not include an id_token")]
    MissingIdToken,

    #[error("identity backend call failed: {0}")]
    IdentityFailure(String),

    #[error("session establishment failed: {0}")]
    SessionEstablishFailure(String),

    #[error("unexpected callback failure: {0}")]
    Unexpected(String),
}

impl CallbackFailure {
    pub fn code(&self) -> AuthErrorCode {
        match self {
            CallbackFailure::ProviderDenied { error, .. } if error == "access_denied" => {
                AuthErrorCode::AccessDenied
            }
            CallbackFailure::ProviderDenied { .. } => AuthErrorCode::OAuthError,
            CallbackFailure::MissingCode => AuthErrorCode::NoCode,
            CallbackFailure::InvalidState(_)
            | CallbackFailure::ExchangeFailure(_)
            | CallbackFailure::MissingIdToken
            | CallbackFailure::IdentityFailure(_) => AuthErrorCode::AuthFailed,
            CallbackFailure::SessionEstablishFailure(_) => AuthErrorCode::SessionFailed,
            CallbackFailure::Unexpected(_) => AuthErrorCode::CallbackFailed,
        }
    }

    /// 리다이렉트 URL의 `message` 매개변수 문구
    ///
    /// 내부 에러 내용은 노출하지 않습니다. 프로바이더가 보낸 설명만 그대로 전달합니다.
    pub fn message(&self) -> String {
        match self {
            CallbackFailure::ProviderDenied { description: Some(d), .. } if !d.trim().is_empty() => {
                d.clone()
            }
            other => other.code().default_message().to_string(),
        }
    }
}
