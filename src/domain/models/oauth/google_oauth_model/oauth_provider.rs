//! OAuth 프로바이더와 주고받는 요청/토큰 모델

use serde::{Deserialize, Serialize};

/// 리프레시 토큰 발급 여부를 결정하는 `access_type` 매개변수
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessType {
    /// 리프레시 토큰 요청
    #[default]
    Offline,
    Online,
}

impl AccessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessType::Offline => "offline",
            AccessType::Online => "online",
        }
    }
}

/// 동의 화면으로 보낼 인가 요청
///
/// 요청마다 새로 만들어지며 저장되지 않습니다.
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthSessionRequest {
    pub client_id: String,
    pub redirect_uri: String,
    /// 순서가 유지되는 스코프 목록
    pub scopes: Vec<String>,
    pub access_type: AccessType,
    pub include_granted_scopes: bool,
    /// 콜백에서 검증할 서명된 `state`
    pub state: String,
}

impl OAuthSessionRequest {
    /// 인가 엔드포인트 URL을 생성합니다.
    ///
    /// 매개변수 순서는 `client_id`, `redirect_uri`, `response_type`, `scope`,
    /// `access_type`, `include_granted_scopes`, `state` 로 고정됩니다.
    ///
    /// ```text
    /// https://accounts.google.com/o/oauth2/v2/auth?
    ///   client_id=CLIENT_ID&
    ///   redirect_uri=https%3A%2F%2Flucidquant.in%2Fauth%2Fgoogle%2Fcallback&
    ///   response_type=code&
    ///   scope=email%20profile%20openid&
    ///   access_type=offline&
    ///   include_granted_scopes=true&
    ///   state=eyJ0eXAi...
    /// ```
    pub fn authorization_url(&self, auth_uri: &str) -> String {
        let scope = self.scopes.join(" ");
        let params = [
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("access_type", self.access_type.as_str()),
            (
                "include_granted_scopes",
                if self.include_granted_scopes { "true" } else { "false" },
            ),
            ("state", self.state.as_str()),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let separator = if auth_uri.contains('?') { '&' } else { '?' };
        format!("{}{}{}", auth_uri, separator, query_string)
    }
}

/// 토큰 엔드포인트 응답
///
/// 콜백 처리 중에만 메모리에 존재하며 어디에도 저장하지 않습니다.
#[derive(Clone, Deserialize, Serialize, PartialEq)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"***")
            .field("id_token", &self.id_token.as_ref().map(|_| "***"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "***"))
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_url_parameter_order() {
        let request = OAuthSessionRequest {
            client_id: "abc.apps.googleusercontent.com".to_string(),
            redirect_uri: "http://localhost:3000/auth/google/callback".to_string(),
            scopes: vec!["email".into(), "profile".into(), "openid".into()],
            access_type: AccessType::Offline,
            include_granted_scopes: true,
            state: "signed.state.value".to_string(),
        };

        let url = request.authorization_url("https://accounts.google.com/o/oauth2/v2/auth");
        assert_eq!(
            url,
            "https://accounts.google.com/o/oauth2/v2/auth?client_id=abc.apps.googleusercontent.com\
             &redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fauth%2Fgoogle%2Fcallback\
             &response_type=code&scope=email%20profile%20openid&access_type=offline\
             &include_granted_scopes=true&state=signed.state.value"
        );
    }

    #[test]
    fn test_token_set_debug_hides_tokens() {
        let tokens: TokenSet = serde_json::from_str(
            r#"{"access_token":"ya29.secret","id_token":"eyJ.secret","expires_in":3599,"token_type":"Bearer"}"#,
        )
        .unwrap();

        let printed = format!("{:?}", tokens);
        assert!(!printed.contains("ya29.secret"));
        assert!(!printed.contains("eyJ.secret"));
        assert_eq!(tokens.expires_in, Some(3599));
        assert!(tokens.refresh_token.is_none());
    }
}
