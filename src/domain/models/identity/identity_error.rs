//! Identity Backend 호출 에러

use serde::Deserialize;
use thiserror::Error;

/// 사용자가 이미 존재함을 나타내는 GoTrue `error_code` 값
pub const CONFLICT_ERROR_CODES: [&str; 2] = ["email_exists", "user_already_exists"];

/// Identity Backend 호출 결과 에러
///
/// `AlreadyRegistered`는 콜백 플로우에서 실패가 아니라 기존 사용자로 진행하는 신호입니다.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity is already registered")]
    AlreadyRegistered,

    #[error("identity backend rejected the request ({status}): {message}")]
    Rejected {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("identity backend unreachable: {0}")]
    Transport(String),

    #[error("identity backend misconfigured: {0}")]
    Misconfigured(String),

    #[error("identity backend timed out")]
    Timeout,
}

/// GoTrue 에러 응답 본문
///
/// 버전에 따라 `{code, error_code, msg}` 또는 `{error, error_description}` 형태로 옵니다.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl IdentityError {
    /// 실패 응답을 분류합니다.
    ///
    /// 충돌 여부는 구조화된 `error_code`로만 판단하며 메시지 문구는 보지 않습니다.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

        let code = parsed.error_code.clone().or_else(|| parsed.error.clone());
        if let Some(code) = parsed.error_code.as_deref() {
            if CONFLICT_ERROR_CODES.contains(&code) {
                return IdentityError::AlreadyRegistered;
            }
        }

        let message = parsed
            .msg
            .or(parsed.message)
            .or(parsed.error_description)
            .or(parsed.error)
            .unwrap_or_else(|| format!("HTTP {}", status));

        IdentityError::Rejected { status, code, message }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, IdentityError::AlreadyRegistered)
    }
}

impl From<reqwest::Error> for IdentityError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            IdentityError::Timeout
        } else {
            IdentityError::Transport(e.to_string())
        }
    }
}

impl From<crate::errors::AppError> for IdentityError {
    fn from(e: crate::errors::AppError) -> Self {
        IdentityError::Misconfigured(e.to_string())
    }
}
