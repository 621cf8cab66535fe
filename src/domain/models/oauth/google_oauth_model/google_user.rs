//! # Google OAuth 사용자 정보 모델
//!
//! Google OAuth 2.0 인증 플로우에서 얻는 사용자 프로필을 다룹니다.
//! 프로필은 두 경로로 얻을 수 있습니다.
//!
//! 1. 토큰 응답에 포함된 ID 토큰의 클레임 ([`IdTokenClaims`])
//! 2. UserInfo 엔드포인트 응답 ([`GoogleUserInfo`])
//!
//! ID 토큰은 서명 검증 없이 클레임만 읽습니다. 서명 검증은 ID 토큰을 넘겨받는
//! Identity Backend의 책임이며, 여기서 읽은 값은 프로필 표시용으로만 사용됩니다.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Google OAuth2 UserInfo 응답 구조체
///
/// `https://www.googleapis.com/oauth2/v2/userinfo` 응답을 역직렬화합니다.
///
/// ## OAuth 2.0 스코프 요구사항
///
/// | 필드 | 필수 스코프 |
/// |------|-------------|
/// | `id`, `email`, `verified_email` | `email` |
/// | `name`, `given_name`, `family_name`, `picture` | `profile` |
///
/// 스코프를 일부만 동의한 경우 프로필 필드가 비어 올 수 있으므로
/// 이메일을 제외한 모든 필드는 선택값입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleUserInfo {
    /// Google 사용자 고유 식별자 (변경되지 않는 숫자 문자열)
    pub id: String,

    /// 사용자 이메일 주소
    pub email: String,

    #[serde(default)]
    pub verified_email: bool,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub given_name: Option<String>,

    #[serde(default)]
    pub family_name: Option<String>,

    /// 프로필 사진 URL
    #[serde(default)]
    pub picture: Option<String>,
}

impl GoogleUserInfo {
    /// 표시용 이름. 이름이 없으면 이메일의 로컬 파트를 사용합니다.
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => self
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// OpenID Connect ID 토큰 클레임
///
/// Google ID 토큰에서 프로필 파생에 필요한 클레임만 정의합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdTokenClaims {
    /// 사용자 고유 식별자
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

impl IdTokenClaims {
    /// ID 토큰의 페이로드를 서명 검증 없이 읽습니다.
    ///
    /// 만료, 대상(aud) 검증도 수행하지 않습니다. 반환된 클레임으로 인증 판단을 해서는 안 됩니다.
    ///
    /// # Errors
    ///
    /// JWT 형식이 아니거나 페이로드가 클레임 구조와 맞지 않으면 에러를 반환합니다.
    pub fn peek(id_token: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        decode::<IdTokenClaims>(id_token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
    }

    /// 이메일이 있는 경우에만 프로필로 변환합니다.
    pub fn into_profile(self) -> Option<GoogleUserInfo> {
        let email = self.email.filter(|e| !e.trim().is_empty())?;

        Some(GoogleUserInfo {
            id: self.sub,
            email,
            verified_email: self.email_verified.unwrap_or(false),
            name: self.name,
            given_name: self.given_name,
            family_name: self.family_name,
            picture: self.picture,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn sign(claims: &serde_json::Value) -> String {
        encode(&Header::default(), claims, &EncodingKey::from_secret(b"unrelated-secret")).unwrap()
    }

    #[test]
    fn test_peek_reads_claims_without_verifying_signature() {
        let token = sign(&serde_json::json!({
            "sub": "10987654321",
            "email": "trader@example.com",
            "email_verified": true,
            "name": "Lucid Trader",
            "picture": "https://example.com/p.png",
            "aud": "some-client",
            "exp": 1
        }));

        let claims = IdTokenClaims::peek(&token).unwrap();
        assert_eq!(claims.sub, "10987654321");
        assert_eq!(claims.email.as_deref(), Some("trader@example.com"));

        let profile = claims.into_profile().unwrap();
        assert_eq!(profile.id, "10987654321");
        assert!(profile.verified_email);
        assert_eq!(profile.display_name(), "Lucid Trader");
    }

    #[test]
    fn test_peek_rejects_garbage() {
        assert!(IdTokenClaims::peek("not-a-jwt").is_err());
    }

    #[test]
    fn test_claims_without_email_have_no_profile() {
        let token = sign(&serde_json::json!({ "sub": "1" }));
        let claims = IdTokenClaims::peek(&token).unwrap();

        assert!(claims.into_profile().is_none());
    }

    #[test]
    fn test_user_info_deserializes_partial_profile() {
        let info: GoogleUserInfo = serde_json::from_str(
            r#"{"id":"42","email":"quant@example.com","verified_email":true}"#,
        )
        .unwrap();

        assert!(info.name.is_none());
        assert_eq!(info.display_name(), "quant");
    }
}
