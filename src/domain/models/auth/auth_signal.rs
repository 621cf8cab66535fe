//! 브라우저 URL에 실려 온 인증 신호 해석
//!
//! 콜백 리다이렉트 이후 페이지 URL의 쿼리와 프래그먼트에는 에러, 토큰,
//! 매직 링크 해시, 인가 코드 중 하나가 실려 올 수 있습니다.
//! [`parse_auth_signal`]은 이를 하나의 [`AuthSignal`]로 분류하는 순수 함수입니다.
//!
//! 우선순위: `Error` > `ImplicitTokens` > `MagicLink` > `Code` > `None`

use super::callback_failure::AuthErrorCode;
use crate::utils::url_utils::{fragment_params, parse_page_url, query_params};

/// 알 수 없는 에러 코드에 설명도 없을 때 사용하는 문구
pub const FALLBACK_ERROR_MESSAGE: &str = "Authentication failed";

/// URL에서 읽어낸 인증 신호
#[derive(Debug, Clone, PartialEq)]
pub enum AuthSignal {
    /// `error` 매개변수가 있음. `message`는 사용자에게 보여줄 문구로 해석된 값입니다.
    Error { code: String, message: String },

    /// 프래그먼트에 세션 토큰이 직접 실려 옴 (쿼리의 토큰은 무시)
    ImplicitTokens {
        access_token: String,
        refresh_token: Option<String>,
        expires_in: Option<i64>,
    },

    /// `token_hash` + `type=magiclink`
    MagicLink { token_hash: String },

    /// 세션으로 교환할 인가 코드
    Code { code: String },

    /// 처리할 신호 없음
    None {
        /// `auth=success` 또는 `oauth=success` 표시 여부
        success_marker: bool,
    },
}

/// 쿼리와 프래그먼트의 매개변수 조회기
struct UrlParams {
    query: Vec<(String, String)>,
    fragment: Vec<(String, String)>,
}

/// 비어 있지 않은 첫 번째 값
fn find<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, v)| k == key && !v.trim().is_empty())
        .map(|(_, v)| v.as_str())
}

impl UrlParams {
    fn from_href(href: &str) -> Self {
        match parse_page_url(href) {
            Some(url) => Self {
                query: query_params(&url),
                fragment: fragment_params(&url),
            },
            None => Self {
                query: Vec::new(),
                fragment: Vec::new(),
            },
        }
    }

    /// 쿼리 우선, 없으면 프래그먼트에서 찾습니다.
    fn get(&self, key: &str) -> Option<&str> {
        find(&self.query, key).or_else(|| find(&self.fragment, key))
    }

    /// 프래그먼트에서만 찾습니다. 서버 로그와 Referer로 새지 않는 위치입니다.
    fn fragment(&self, key: &str) -> Option<&str> {
        find(&self.fragment, key)
    }
}

/// 에러 코드와 설명으로 사용자 문구를 결정합니다.
///
/// 1. `access_denied`, `auth_failed` 는 고정 문구
/// 2. 설명(`error_description` 또는 `message`)이 있으면 그 값
/// 3. 알려진 코드면 코드별 기본 문구
/// 4. 그 외 [`FALLBACK_ERROR_MESSAGE`]
pub fn resolve_error_message(code: &str, description: Option<&str>) -> String {
    match AuthErrorCode::from_str(code) {
        Some(known @ (AuthErrorCode::AccessDenied | AuthErrorCode::AuthFailed)) => {
            known.default_message().to_string()
        }
        known => match description.map(str::trim).filter(|d| !d.is_empty()) {
            Some(description) => description.to_string(),
            None => known
                .map(|c| c.default_message())
                .unwrap_or(FALLBACK_ERROR_MESSAGE)
                .to_string(),
        },
    }
}

/// 페이지 URL을 인증 신호로 분류합니다.
///
/// 값은 form 디코딩(`+` → 공백)된 상태로 비교됩니다. 절대 URL과 경로 형태 모두 받습니다.
///
/// ```rust,ignore
/// let signal = parse_auth_signal("/?error=access_denied#access_token=abc");
/// assert!(matches!(signal, AuthSignal::Error { .. }));
/// ```
pub fn parse_auth_signal(url: &str) -> AuthSignal {
    let params = UrlParams::from_href(url);

    if let Some(code) = params.get("error") {
        let description = params.get("error_description").or_else(|| params.get("message"));
        return AuthSignal::Error {
            code: code.to_string(),
            message: resolve_error_message(code, description),
        };
    }

    if let Some(access_token) = params.fragment("access_token") {
        return AuthSignal::ImplicitTokens {
            access_token: access_token.to_string(),
            refresh_token: params.fragment("refresh_token").map(str::to_string),
            expires_in: params.fragment("expires_in").and_then(|v| v.parse().ok()),
        };
    }

    if let (Some(token_hash), Some("magiclink")) = (params.get("token_hash"), params.get("type")) {
        return AuthSignal::MagicLink {
            token_hash: token_hash.to_string(),
        };
    }

    if let Some(code) = params.get("code") {
        return AuthSignal::Code {
            code: code.to_string(),
        };
    }

    let success_marker = ["auth", "oauth"]
        .iter()
        .any(|key| params.get(key) == Some("success"));

    AuthSignal::None { success_marker }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_denied_uses_fixed_message() {
        let signal = parse_auth_signal("https://lucidquant.in/?error=access_denied&error_description=User+said+no");

        assert_eq!(
            signal,
            AuthSignal::Error {
                code: "access_denied".to_string(),
                message: "Access was denied. Please try again.".to_string(),
            }
        );
    }

    #[test]
    fn test_error_takes_precedence_over_fragment_tokens() {
        let signal = parse_auth_signal("/?error=auth_failed#access_token=at&refresh_token=rt");

        assert_eq!(
            signal,
            AuthSignal::Error {
                code: "auth_failed".to_string(),
                message: "Authentication failed. Please try again.".to_string(),
            }
        );
    }

    #[test]
    fn test_error_description_is_form_decoded() {
        let signal = parse_auth_signal("/#error=server_error&error_description=Database+error+saving+user");

        assert_eq!(
            signal,
            AuthSignal::Error {
                code: "server_error".to_string(),
                message: "Database error saving user".to_string(),
            }
        );
    }

    #[test]
    fn test_message_parameter_is_a_description() {
        let signal = parse_auth_signal("/?error=oauth_error&message=Scope%20not%20granted");

        match signal {
            AuthSignal::Error { message, .. } => assert_eq!(message, "Scope not granted"),
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_known_code_without_description_uses_code_text() {
        match parse_auth_signal("/?error=no_code") {
            AuthSignal::Error { message, .. } => {
                assert_eq!(message, AuthErrorCode::NoCode.default_message())
            }
            other => panic!("Expected Error, got {:?}", other),
        }

        match parse_auth_signal("/?error=temporarily_unavailable") {
            AuthSignal::Error { message, .. } => assert_eq!(message, FALLBACK_ERROR_MESSAGE),
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_implicit_tokens_from_fragment() {
        let signal = parse_auth_signal(
            "/?auth=success#access_token=at&refresh_token=rt&expires_in=3600&token_type=bearer",
        );

        assert_eq!(
            signal,
            AuthSignal::ImplicitTokens {
                access_token: "at".to_string(),
                refresh_token: Some("rt".to_string()),
                expires_in: Some(3600),
            }
        );
    }

    #[test]
    fn test_query_tokens_are_ignored() {
        assert_eq!(
            parse_auth_signal("/?access_token=injected&refresh_token=rt"),
            AuthSignal::None {
                success_marker: false
            }
        );
        assert_eq!(
            parse_auth_signal("/?access_token=injected&code=xyz"),
            AuthSignal::Code {
                code: "xyz".to_string()
            }
        );
    }

    #[test]
    fn test_magic_link_requires_type() {
        assert_eq!(
            parse_auth_signal("/auth/callback?token_hash=abc&type=magiclink"),
            AuthSignal::MagicLink {
                token_hash: "abc".to_string()
            }
        );
        assert_eq!(
            parse_auth_signal("/auth/callback?token_hash=abc&type=recovery"),
            AuthSignal::None {
                success_marker: false
            }
        );
    }

    #[test]
    fn test_magic_link_beats_code() {
        assert!(matches!(
            parse_auth_signal("/?code=xyz&token_hash=abc&type=magiclink"),
            AuthSignal::MagicLink { .. }
        ));
        assert_eq!(
            parse_auth_signal("/?code=xyz"),
            AuthSignal::Code {
                code: "xyz".to_string()
            }
        );
    }

    #[test]
    fn test_success_marker_and_plain_urls() {
        assert_eq!(
            parse_auth_signal("/?oauth=success"),
            AuthSignal::None {
                success_marker: true
            }
        );
        assert_eq!(
            parse_auth_signal("/dashboard"),
            AuthSignal::None {
                success_marker: false
            }
        );
        assert_eq!(
            parse_auth_signal("/?error="),
            AuthSignal::None {
                success_marker: false
            }
        );
    }
}
