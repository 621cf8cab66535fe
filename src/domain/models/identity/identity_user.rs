//! Identity Backend 사용자 레코드 모델
//!
//! Supabase GoTrue 호환 관리자 API가 주고받는 사용자 표현입니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthProvider;
use crate::domain::models::oauth::GoogleUserInfo;

/// 사용자 메타데이터
///
/// 외부 로그인 프로바이더에서 가져온 프로필 정보를 보관합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// 프로바이더 태그 (`"google"`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// 프로바이더 측 사용자 식별자
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
}

/// Identity Backend에 저장된 사용자 레코드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// 사용자 생성 요청 본문
///
/// Google 로그인으로 검증된 이메일만 다루므로 `email_confirm`은 항상 `true`로 보냅니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewIdentity {
    pub email: String,
    pub email_confirm: bool,
    pub user_metadata: UserMetadata,
}

impl NewIdentity {
    pub fn from_google(profile: &GoogleUserInfo) -> Self {
        Self {
            email: profile.email.clone(),
            email_confirm: true,
            user_metadata: UserMetadata {
                full_name: Some(profile.display_name()),
                avatar_url: profile.picture.clone(),
                provider: Some(AuthProvider::Google.as_str().to_string()),
                provider_id: Some(profile.id.clone()),
            },
        }
    }
}
