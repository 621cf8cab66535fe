//! # Domain Module
//!
//! - [`dto`] - HTTP 요청/응답 구조체
//! - [`models`] - 인증 플로우와 시장 데이터 값 객체

pub mod dto;
pub mod models;
