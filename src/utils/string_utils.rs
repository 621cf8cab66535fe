//! # 문자열 유틸리티
//!
//! 문자열 처리와 관련된 공통 유틸리티 함수들입니다.
//! 선택적 문자열 정리와 로그용 지문 생성을 포함합니다.

use serde::Deserialize;
use sha2::{Digest, Sha256};

/// 선택적 문자열 필드 정리
///
/// None 값이거나 빈 문자열/공백만 있는 경우 None을 반환하고,
/// 유효한 문자열인 경우 앞뒤 공백을 제거한 문자열을 Some 옵션으로 반환합니다.
///
/// # 예제
/// ```rust,ignore
/// use crate::utils::string_utils::clean_optional_string;
///
/// assert_eq!(clean_optional_string(Some("  Hello  ".to_string())), Some("Hello".to_string()));
/// assert_eq!(clean_optional_string(Some("   ".to_string())), None);
/// assert_eq!(clean_optional_string(None), None);
/// ```
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 선택적 문자열 필드를 위한 serde deserializer
///
/// 빈 문자열이나 공백만 있는 문자열을 None으로 변환합니다.
/// 쿼리 매개변수에 사용할 때는 `#[serde(default)]`와 함께 지정해야 합니다.
///
/// # 예제
/// ```rust,ignore
/// #[derive(Deserialize)]
/// struct CallbackQuery {
///     #[serde(default, deserialize_with = "deserialize_optional_string")]
///     code: Option<String>,
/// }
///
/// // ?code=   → None
/// // ?code=abc → Some("abc")
/// ```
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

/// 민감한 값을 로그에 남길 때 사용할 짧은 SHA-256 지문
///
/// 원문을 복원할 수 없는 앞 12자리 16진수만 반환합니다.
pub fn fingerprint(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    digest
        .iter()
        .take(6)
        .map(|b| format!("{:02x}", b))
        .collect()
}
