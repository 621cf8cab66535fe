//! 인증 응답 관련 DTO

use serde::Serialize;

/// `GET /auth/google/url` 응답
#[derive(Debug, Serialize)]
pub struct OAuthLoginUrlResponse {
    /// Google 동의 화면 URL
    pub login_url: String,
}
