//! 브라우저 주소 표시줄 추상화

use crate::utils::url_utils::parse_page_url;

/// 현재 페이지 URL을 읽고, 새로고침 없이 교체합니다 (`history.replaceState`).
pub trait BrowserLocation {
    fn href(&self) -> &str;
    fn replace_state(&mut self, url: &str);
}

/// 쿼리와 프래그먼트를 떼어낸 경로만 남깁니다.
///
/// `https://lucidquant.in/dashboard?error=x#a=b` → `/dashboard`
pub fn path_only(href: &str) -> String {
    parse_page_url(href)
        .map(|url| url.path().to_string())
        .unwrap_or_else(|| "/".to_string())
}

/// 메모리 안의 주소. 교체 횟수를 기록합니다.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryLocation {
    href: String,
    pub replacements: usize,
}

impl MemoryLocation {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            replacements: 0,
        }
    }
}

impl BrowserLocation for MemoryLocation {
    fn href(&self) -> &str {
        &self.href
    }

    fn replace_state(&mut self, url: &str) {
        self.href = url.to_string();
        self.replacements += 1;
    }
}
