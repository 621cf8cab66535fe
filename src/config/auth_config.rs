//! # Authentication Configuration Module
//!
//! Google OAuth 클라이언트, Identity Backend(Supabase 호환 인증 서버),
//! 세션 전달 방식 등 인증 관련 설정을 관리하는 모듈입니다.
//!
//! 모든 설정은 프로세스 시작 시 한 번 구조체로 로드되어 서비스에 주입됩니다.
//! 필수 자격 증명이 없더라도 서버는 기동되며, 해당 값이 필요한 시점에
//! [`AppError::ConfigurationError`]로 보고됩니다.
//!
//! ## 필수 환경 변수 설정
//!
//! ### Google OAuth 설정
//! ```bash
//! export GOOGLE_CLIENT_ID="your-google-client-id"
//! export GOOGLE_CLIENT_SECRET="your-google-client-secret"
//! # 선택: 지정하지 않으면 실행 환경의 프론트엔드 URL + OAUTH_CALLBACK_PATH
//! export GOOGLE_REDIRECT_URI="https://lucidquant.in/auth/google/callback"
//! # 선택: OAuth state 서명 키. 없으면 GOOGLE_CLIENT_SECRET 으로 서명
//! export OAUTH_STATE_SECRET="random-32-bytes"
//! ```
//!
//! ### Identity Backend 설정
//! ```bash
//! export SUPABASE_URL="https://your-project.supabase.co"
//! export SUPABASE_SERVICE_ROLE_KEY="service-role-key"   # 서버 전용
//! export SUPABASE_ANON_KEY="anon-key"                   # 브라우저 공개 키
//! export AUTH_SESSION_HANDOFF="id_token"                # id_token | provision | magic_link
//! ```

use crate::config::{non_empty_var, AppUrlConfig};
use crate::errors::AppError;


/// Google OAuth 2.0 클라이언트 설정
///
/// Google Cloud Console 에서 생성한 OAuth 2.0 클라이언트 정보를 담습니다.
/// 리다이렉트 URI는 Console의 승인된 리디렉션 URI 목록에 등록되어 있어야 합니다.
///
/// ## 보안 고려사항
///
/// - `client_secret`은 절대 클라이언트 사이드에 노출되어서는 안 됩니다
/// - `Debug` 출력에서도 시크릿은 마스킹됩니다
#[derive(Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// OAuth `state` 서명 키
    pub state_secret: Option<String>,
    pub redirect_uri: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub userinfo_uri: String,
    /// 동의 화면에 요청할 스코프 (순서 유지)
    pub scopes: Vec<String>,
}

/// 검증이 끝난 OAuth 클라이언트 자격 증명
#[derive(Debug, Clone, Copy)]
pub struct OAuthCredentials<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

impl GoogleOAuthConfig {
    pub const DEFAULT_AUTH_URI: &'static str = "https://accounts.google.com/o/oauth2/v2/auth";
    pub const DEFAULT_TOKEN_URI: &'static str = "https://oauth2.googleapis.com/token";
    pub const DEFAULT_USERINFO_URI: &'static str = "https://www.googleapis.com/oauth2/v2/userinfo";
    pub const DEFAULT_SCOPES: [&'static str; 3] = ["email", "profile", "openid"];

    /// 환경 변수에서 Google OAuth 설정을 로드합니다.
    ///
    /// `GOOGLE_REDIRECT_URI`가 없으면 `urls.callback_url()`을 사용합니다.
    pub fn from_env(urls: &AppUrlConfig) -> Self {
        let scopes = match non_empty_var("GOOGLE_OAUTH_SCOPES") {
            Some(raw) => normalize_scopes(raw.split(|c: char| c == ',' || c.is_whitespace())),
            None => normalize_scopes(Self::DEFAULT_SCOPES),
        };

        Self {
            client_id: non_empty_var("GOOGLE_CLIENT_ID"),
            client_secret: non_empty_var("GOOGLE_CLIENT_SECRET"),
            state_secret: non_empty_var("OAUTH_STATE_SECRET"),
            redirect_uri: non_empty_var("GOOGLE_REDIRECT_URI").unwrap_or_else(|| urls.callback_url()),
            auth_uri: non_empty_var("GOOGLE_AUTH_URI").unwrap_or_else(|| Self::DEFAULT_AUTH_URI.to_string()),
            token_uri: non_empty_var("GOOGLE_TOKEN_URI").unwrap_or_else(|| Self::DEFAULT_TOKEN_URI.to_string()),
            userinfo_uri: non_empty_var("GOOGLE_USERINFO_URI")
                .unwrap_or_else(|| Self::DEFAULT_USERINFO_URI.to_string()),
            scopes,
        }
    }

    /// 테스트와 수동 구성을 위한 생성자. 엔드포인트는 Google 기본값을 사용합니다.
    pub fn new(
        client_id: Option<String>,
        client_secret: Option<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.filter(|v| !v.trim().is_empty()),
            client_secret: client_secret.filter(|v| !v.trim().is_empty()),
            state_secret: None,
            redirect_uri: redirect_uri.into(),
            auth_uri: Self::DEFAULT_AUTH_URI.to_string(),
            token_uri: Self::DEFAULT_TOKEN_URI.to_string(),
            userinfo_uri: Self::DEFAULT_USERINFO_URI.to_string(),
            scopes: normalize_scopes(Self::DEFAULT_SCOPES),
        }
    }

    /// Client ID와 Client Secret이 모두 설정되어 있는지 검증합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigurationError` - 누락된 환경 변수 이름을 포함
    pub fn credentials(&self) -> Result<OAuthCredentials<'_>, AppError> {
        match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(client_id), Some(client_secret)) => Ok(OAuthCredentials { client_id, client_secret }),
            (None, Some(_)) => Err(AppError::ConfigurationError(
                "GOOGLE_CLIENT_ID is not set".to_string(),
            )),
            (Some(_), None) => Err(AppError::ConfigurationError(
                "GOOGLE_CLIENT_SECRET is not set".to_string(),
            )),
            (None, None) => Err(AppError::ConfigurationError(
                "GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET are not set".to_string(),
            )),
        }
    }
}

impl std::fmt::Debug for GoogleOAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleOAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("state_secret", &self.state_secret.as_ref().map(|_| "***"))
            .field("redirect_uri", &self.redirect_uri)
            .field("auth_uri", &self.auth_uri)
            .field("token_uri", &self.token_uri)
            .field("userinfo_uri", &self.userinfo_uri)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// 스코프 목록을 정리합니다.
///
/// 순서를 유지하며 중복과 빈 값을 제거하고, `email`과 `profile`이
/// 빠져 있으면 뒤에 추가합니다.
pub fn normalize_scopes<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut scopes: Vec<String> = Vec::new();
    for scope in raw {
        let scope = scope.as_ref().trim();
        if !scope.is_empty() && !scopes.iter().any(|s| s == scope) {
            scopes.push(scope.to_string());
        }
    }

    for required in ["email", "profile"] {
        if !scopes.iter().any(|s| s == required) {
            scopes.push(required.to_string());
        }
    }

    scopes
}

/// Identity Backend(Supabase GoTrue 호환) 접속 설정
///
/// 서비스 키는 서버에서만 사용되며, 익명 키는 브라우저 측 세션 클라이언트가 사용합니다.
#[derive(Clone, Default)]
pub struct IdentityBackendConfig {
    pub base_url: Option<String>,
    pub service_role_key: Option<String>,
    pub anon_key: Option<String>,
}

impl IdentityBackendConfig {
    /// `SUPABASE_*` 변수를 우선 사용하고, 없으면 프론트엔드용 `VITE_SUPABASE_*` 값을 사용합니다.
    pub fn from_env() -> Self {
        let config = Self {
            base_url: non_empty_var("SUPABASE_URL")
                .or_else(|| non_empty_var("VITE_SUPABASE_URL"))
                .map(|v| v.trim_end_matches('/').to_string()),
            service_role_key: non_empty_var("SUPABASE_SERVICE_ROLE_KEY"),
            anon_key: non_empty_var("SUPABASE_ANON_KEY").or_else(|| non_empty_var("VITE_SUPABASE_ANON_KEY")),
        };

        if config.service_role_key.is_none() {
            log::warn!("SUPABASE_SERVICE_ROLE_KEY not set, identity provisioning calls will fail");
        }

        config
    }

    /// 서버 측 호출에 필요한 (URL, 서비스 키)를 반환합니다.
    pub fn admin_endpoint(&self) -> Result<(&str, &str), AppError> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| AppError::ConfigurationError("SUPABASE_URL is not set".to_string()))?;
        let key = self
            .service_role_key
            .as_deref()
            .ok_or_else(|| AppError::ConfigurationError("SUPABASE_SERVICE_ROLE_KEY is not set".to_string()))?;

        Ok((base_url, key))
    }

    /// 브라우저 측 호출에 필요한 (URL, 익명 키)를 반환합니다.
    pub fn public_endpoint(&self) -> Result<(&str, &str), AppError> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| AppError::ConfigurationError("SUPABASE_URL is not set".to_string()))?;
        let key = self
            .anon_key
            .as_deref()
            .ok_or_else(|| AppError::ConfigurationError("SUPABASE_ANON_KEY is not set".to_string()))?;

        Ok((base_url, key))
    }
}

impl std::fmt::Debug for IdentityBackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityBackendConfig")
            .field("base_url", &self.base_url)
            .field("service_role_key", &self.service_role_key.as_ref().map(|_| "***"))
            .field("anon_key", &self.anon_key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// 콜백 완료 후 세션을 브라우저로 넘기는 방식
///
/// | 값 | Identity Backend 호출 | 성공 시 리다이렉트 |
/// |----|----------------------|-------------------|
/// | `IdToken` | ID 토큰으로 로그인 | `/?auth=success#access_token=...` |
/// | `Provision` | 사용자 생성 (이미 있으면 계속) 후 ID 토큰 로그인 | `/?auth=success#access_token=...` |
/// | `MagicLink` | 사용자 생성 + 일회용 로그인 링크 발급 | `/auth/callback?token_hash=...&type=magiclink` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionHandoff {
    /// ID 토큰으로 바로 세션을 발급받는 기본 방식
    #[default]
    IdToken,
    /// 사용자 레코드를 먼저 생성/확인한 뒤 세션 발급
    Provision,
    /// 사용자 생성 후 매직 링크를 경유하는 레거시 방식
    MagicLink,
}

impl SessionHandoff {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "id_token" | "idtoken" | "direct" => Ok(SessionHandoff::IdToken),
            "provision" | "admin" => Ok(SessionHandoff::Provision),
            "magic_link" | "magiclink" => Ok(SessionHandoff::MagicLink),
            other => Err(format!("Unsupported session handoff: {}", other)),
        }
    }

    /// `AUTH_SESSION_HANDOFF`를 읽습니다. 잘못된 값이면 경고 후 기본값을 사용합니다.
    pub fn from_env() -> Self {
        match non_empty_var("AUTH_SESSION_HANDOFF") {
            Some(raw) => Self::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("{}. 기본값 id_token 사용", e);
                SessionHandoff::IdToken
            }),
            None => SessionHandoff::IdToken,
        }
    }
}

/// 외부 로그인 프로바이더 태그
///
/// Identity Backend에 사용자 메타데이터로 저장되는 값입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// Google OAuth 2.0
    Google,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Google => "google",
        }
    }
}
