//! 공통 유틸리티 함수 모듈
//!
//! 애플리케이션 전체에서 사용되는 공통 유틸리티 함수들을 제공합니다.
//!
//! # Modules
//!
//! - [`string_utils`] - 문자열 정리, 로그용 지문
//! - [`url_utils`] - 브라우저 주소 해석, 쿼리/프래그먼트 매개변수
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::utils::string_utils::fingerprint;
//! use crate::utils::url_utils::{parse_page_url, query_params};
//!
//! let url = parse_page_url("/?error=access_denied&error_description=User+denied").unwrap();
//! let params = query_params(&url);
//! log::info!("code fingerprint: {}", fingerprint(code));
//! ```

pub mod string_utils;
pub mod url_utils;
