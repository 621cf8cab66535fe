//! # URL 유틸리티
//!
//! 브라우저 주소(절대 URL 또는 `/path?query#fragment` 형태)를 [`url::Url`]로 해석합니다.
//! 상대 주소는 임의의 기준 URL에 결합하여 경로, 쿼리, 프래그먼트만 사용합니다.

use url::{form_urlencoded, Url};

/// 상대 주소를 해석할 때 사용하는 기준. 호스트 부분은 결과에 쓰이지 않습니다.
const RELATIVE_BASE: &str = "http://localhost/";

/// 페이지 주소를 파싱합니다. 해석할 수 없으면 `None`입니다.
///
/// ```rust,ignore
/// let url = parse_page_url("/?auth=success#access_token=x").unwrap();
/// assert_eq!(url.path(), "/");
/// assert_eq!(url.fragment(), Some("access_token=x"));
/// ```
pub fn parse_page_url(href: &str) -> Option<Url> {
    match Url::parse(href) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(RELATIVE_BASE).ok()?.join(href).ok()
        }
        Err(e) => {
            log::debug!("페이지 URL 해석 실패: {}", e);
            None
        }
    }
}

/// 쿼리 매개변수를 순서대로 (키, 값) 목록으로 반환합니다. `+`는 공백으로 디코딩됩니다.
pub fn query_params(url: &Url) -> Vec<(String, String)> {
    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// 프래그먼트를 `application/x-www-form-urlencoded` 로 해석합니다.
pub fn fragment_params(url: &Url) -> Vec<(String, String)> {
    url.fragment()
        .map(|fragment| {
            form_urlencoded::parse(fragment.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
        .unwrap_or_default()
}

/// 쿼리나 프래그먼트 구분자가 있는지 여부. 내용이 비어 있어도 `true`입니다.
pub fn has_query_or_fragment(href: &str) -> bool {
    parse_page_url(href).is_some_and(|url| url.query().is_some() || url.fragment().is_some())
}
