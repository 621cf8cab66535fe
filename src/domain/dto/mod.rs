//! # Data Transfer Objects (DTO) Module
//!
//! HTTP 경계에서 주고받는 요청/응답 구조체입니다.
//!
//! - [`auth`] - OAuth 콜백 쿼리, 로그인 URL 응답
//! - [`market`] - 시세 조회 경로/쿼리 매개변수

pub mod auth;
pub mod market;

pub use auth::*;
pub use market::*;
