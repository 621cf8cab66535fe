//! # OAuth Provider Client
//!
//! 인가 코드를 토큰으로 교환하고 사용자 정보를 조회하는 외부 OAuth 프로바이더 경계입니다.
//! 콜백 플로우는 [`OAuthProvider`] 트레이트에만 의존하므로 테스트에서 스텁으로 대체할 수 있습니다.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::GoogleOAuthConfig;
use crate::domain::models::oauth::{GoogleUserInfo, TokenSet};
use crate::errors::{AppError, ErrorContext};

/// 외부 OAuth 프로바이더
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// 인가 코드를 토큰 세트로 교환합니다. 코드는 한 번만 사용할 수 있습니다.
    async fn exchange_code(&self, code: &str) -> Result<TokenSet, AppError>;

    /// 액세스 토큰으로 사용자 프로필을 조회합니다.
    async fn fetch_user_info(&self, access_token: &str) -> Result<GoogleUserInfo, AppError>;
}

/// 토큰 엔드포인트 에러 응답 (`{"error": "invalid_grant", "error_description": "Bad Request"}`)
#[derive(Debug, Default, Deserialize)]
struct OAuthErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl OAuthErrorBody {
    fn summary(body: &str, status: reqwest::StatusCode) -> String {
        let parsed: OAuthErrorBody = serde_json::from_str(body).unwrap_or_default();
        match (parsed.error, parsed.error_description) {
            (Some(error), Some(description)) => format!("{} ({})", error, description),
            (Some(error), None) => error,
            _ => format!("HTTP {}", status.as_u16()),
        }
    }
}

/// Google OAuth 2.0 HTTP 클라이언트
///
/// 공유 `reqwest::Client`를 사용하며 클라이언트에 설정된 타임아웃이 모든 요청에 적용됩니다.
pub struct GoogleOAuthClient {
    http: reqwest::Client,
    config: GoogleOAuthConfig,
}

impl GoogleOAuthClient {
    pub fn new(http: reqwest::Client, config: GoogleOAuthConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl OAuthProvider for GoogleOAuthClient {
    async fn exchange_code(&self, code: &str) -> Result<TokenSet, AppError> {
        let credentials = self.config.credentials()?;

        let params = [
            ("code", code),
            ("client_id", credentials.client_id),
            ("client_secret", credentials.client_secret),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http
            .post(&self.config.token_uri)
            .form(&params)
            .send()
            .await
            .external("Google 토큰 요청 실패")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "Google 토큰 교환 실패: {}",
                OAuthErrorBody::summary(&error_text, status)
            )));
        }

        response
            .json::<TokenSet>()
            .await
            .external("Google 토큰 응답 파싱 실패")
    }

    async fn fetch_user_info(&self, access_token: &str) -> Result<GoogleUserInfo, AppError> {
        let response = self
            .http
            .get(&self.config.userinfo_uri)
            .bearer_auth(access_token)
            .send()
            .await
            .external("Google 사용자 정보 요청 실패")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "Google 사용자 정보 조회 실패: {}",
                OAuthErrorBody::summary(&error_text, status)
            )));
        }

        response
            .json::<GoogleUserInfo>()
            .await
            .external("Google 사용자 정보 파싱 실패")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_summary_prefers_structured_body() {
        let status = reqwest::StatusCode::BAD_REQUEST;

        assert_eq!(
            OAuthErrorBody::summary(r#"{"error":"invalid_grant","error_description":"Bad Request"}"#, status),
            "invalid_grant (Bad Request)"
        );
        assert_eq!(OAuthErrorBody::summary(r#"{"error":"invalid_client"}"#, status), "invalid_client");
        assert_eq!(OAuthErrorBody::summary("<html/>", status), "HTTP 400");
    }

    #[actix_web::test]
    async fn test_exchange_without_credentials_fails_before_network() {
        let client = GoogleOAuthClient::new(
            reqwest::Client::new(),
            GoogleOAuthConfig::new(None, None, "http://localhost:3000/auth/google/callback"),
        );

        let result = client.exchange_code("any").await;
        assert!(matches!(result, Err(AppError::ConfigurationError(_))));
    }
}
