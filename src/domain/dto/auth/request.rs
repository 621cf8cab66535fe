//! 인증 요청 관련 DTO
//!
//! OAuth 프로바이더가 콜백 URL로 돌려보내는 쿼리 매개변수를 매핑합니다.

use serde::Deserialize;

use crate::utils::string_utils::deserialize_optional_string;

/// `GET /auth/google/callback` 쿼리
///
/// 프로바이더는 성공 시 `code`를, 실패 시 `error`를 보냅니다.
/// 어떤 조합이 와도 역직렬화는 성공해야 하므로 모든 필드가 선택값이며,
/// 빈 문자열은 값이 없는 것으로 취급합니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuthCallbackQuery {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub code: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub error: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub error_description: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub state: Option<String>,
}
