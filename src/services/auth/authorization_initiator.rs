//! # Authorization Initiator
//!
//! Google 동의 화면 URL을 만드는 순수 컴포넌트입니다. 네트워크를 사용하지 않습니다.
//!
//! 자격 증명이 없으면 URL을 만들기 전에 [`AppError::ConfigurationError`]를 반환합니다.
//! 이 에러는 인증 실패가 아닌 배포 결함이므로 HTTP 500 JSON 으로 응답됩니다.
//!
//! 요청마다 [`OAuthStateSigner`]로 새 `state`를 발급하여 URL에 포함합니다.

use crate::config::GoogleOAuthConfig;
use crate::domain::models::oauth::{AccessType, OAuthSessionRequest};
use crate::errors::AppError;
use crate::services::auth::OAuthStateSigner;

/// Google OAuth 인가 요청 생성기
///
/// ## 사용 예제
///
/// ```rust,ignore
/// let initiator = AuthorizationInitiator::new(GoogleOAuthConfig::from_env(&urls));
///
/// // 302 리다이렉트
/// HttpResponse::Found()
///     .append_header(("Location", initiator.consent_url()?))
///     .finish()
/// ```
#[derive(Debug, Clone)]
pub struct AuthorizationInitiator {
    config: GoogleOAuthConfig,
    state: OAuthStateSigner,
}

impl AuthorizationInitiator {
    /// `state` 서명 키는 설정에서 가져옵니다 ([`OAuthStateSigner::from_config`]).
    pub fn new(config: GoogleOAuthConfig) -> Self {
        let state = OAuthStateSigner::from_config(&config);
        Self { config, state }
    }

    /// 현재 설정으로 인가 요청을 구성합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigurationError` - Client ID 또는 Client Secret 누락
    pub fn build_request(&self) -> Result<OAuthSessionRequest, AppError> {
        let credentials = self.config.credentials()?;

        Ok(OAuthSessionRequest {
            client_id: credentials.client_id.to_string(),
            redirect_uri: self.config.redirect_uri.clone(),
            scopes: self.config.scopes.clone(),
            access_type: AccessType::Offline,
            include_granted_scopes: true,
            state: self.state.issue()?,
        })
    }

    /// 동의 화면 URL
    pub fn consent_url(&self) -> Result<String, AppError> {
        let request = self.build_request()?;
        let url = request.authorization_url(&self.config.auth_uri);

        log::debug!(
            "Google consent URL generated (redirect_uri: {}, scopes: {})",
            request.redirect_uri,
            request.scopes.join(" ")
        );

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::{Position, Url};

    fn configured() -> AuthorizationInitiator {
        AuthorizationInitiator::new(GoogleOAuthConfig::new(
            Some("client-123.apps.googleusercontent.com".to_string()),
            Some("top-secret-value".to_string()),
            "https://lucidquant.in/auth/google/callback",
        ))
    }

    #[test]
    fn test_consent_url_contains_required_parameters() {
        let url = Url::parse(&configured().consent_url().unwrap()).unwrap();
        let get = |key: &str| {
            url.query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
        };

        assert_eq!(&url[..Position::AfterPath], GoogleOAuthConfig::DEFAULT_AUTH_URI);
        assert_eq!(get("client_id").as_deref(), Some("client-123.apps.googleusercontent.com"));
        assert_eq!(
            get("redirect_uri").as_deref(),
            Some("https://lucidquant.in/auth/google/callback")
        );
        assert_eq!(get("response_type").as_deref(), Some("code"));
        assert_eq!(get("access_type").as_deref(), Some("offline"));
        assert_eq!(get("include_granted_scopes").as_deref(), Some("true"));

        let scope = get("scope").unwrap();
        let scopes: Vec<&str> = scope.split(' ').collect();
        assert!(scopes.contains(&"email"));
        assert!(scopes.contains(&"profile"));

        let state = get("state").unwrap();
        assert!(OAuthStateSigner::new(Some("top-secret-value".to_string())).verify(&state).is_ok());
    }

    #[test]
    fn test_each_consent_url_has_fresh_state() {
        let initiator = configured();

        let first = initiator.build_request().unwrap().state;
        let second = initiator.build_request().unwrap().state;

        assert_ne!(first, second);
    }

    #[test]
    fn test_secret_never_appears_in_url() {
        let url = configured().consent_url().unwrap();

        assert!(!url.contains("top-secret-value"));
    }

    #[test]
    fn test_missing_credentials_is_configuration_error() {
        let initiator = AuthorizationInitiator::new(GoogleOAuthConfig::new(
            None,
            Some("secret".to_string()),
            "http://localhost:3000/auth/google/callback",
        ));

        match initiator.consent_url() {
            Err(AppError::ConfigurationError(msg)) => assert!(msg.contains("GOOGLE_CLIENT_ID")),
            other => panic!("Expected ConfigurationError, got {:?}", other),
        }

        let initiator = AuthorizationInitiator::new(GoogleOAuthConfig::new(
            Some("id".to_string()),
            Some(String::new()),
            "http://localhost:3000/auth/google/callback",
        ));
        assert!(matches!(initiator.build_request(), Err(AppError::ConfigurationError(_))));
    }
}
