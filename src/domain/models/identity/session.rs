//! Identity Backend 세션 모델

use serde::{Deserialize, Serialize};

use super::identity_user::IdentityUser;

/// Identity Backend가 발급한 세션
///
/// 브라우저 측 세션 저장소에 그대로 보관되며, 같은 세션을 다시 설정하는 것은
/// 상태 변경으로 취급하지 않도록 값 비교를 지원합니다.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentitySession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// 만료 시각 (Unix 초)
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub user: Option<IdentityUser>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl IdentitySession {
    /// 토큰만으로 세션을 구성합니다. 사용자 정보는 이후 조회로 채워집니다.
    pub fn from_tokens(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in: Option<i64>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_in,
            expires_at: None,
            token_type: default_token_type(),
            user: None,
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.email.as_deref())
    }
}

impl std::fmt::Debug for IdentitySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentitySession")
            .field("access_token", &"***")
            .field("refresh_token", &"***")
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .field("token_type", &self.token_type)
            .field("user", &self.user)
            .finish()
    }
}

/// 관리자 API로 발급한 일회용 로그인 링크
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagicLink {
    /// 브라우저가 `verify`에 제출하는 해시 토큰
    pub hashed_token: String,
    #[serde(default)]
    pub action_link: Option<String>,
    #[serde(default)]
    pub verification_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_from_token_response() {
        let session: IdentitySession = serde_json::from_str(
            r#"{
                "access_token": "at",
                "refresh_token": "rt",
                "expires_in": 3600,
                "expires_at": 1714567890,
                "token_type": "bearer",
                "user": {"id": "0b7a3c9e-5d1f-4c41-9a52-4d0e1f6a2b77", "email": "trader@example.com"}
            }"#,
        )
        .unwrap();

        assert_eq!(session.email(), Some("trader@example.com"));
        assert_eq!(session.expires_in, Some(3600));
        assert!(!format!("{:?}", session).contains("\"at\""));
    }

    #[test]
    fn test_magic_link_from_generate_link_response() {
        let link: MagicLink = serde_json::from_str(
            r#"{"id":"x","action_link":"https://p.supabase.co/auth/v1/verify?token=abc","hashed_token":"abc123","verification_type":"magiclink"}"#,
        )
        .unwrap();

        assert_eq!(link.hashed_token, "abc123");
        assert_eq!(link.verification_type.as_deref(), Some("magiclink"));
    }
}
