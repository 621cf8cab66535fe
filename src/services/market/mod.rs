//! 시장 데이터 서비스 모듈
//!
//! 주식 시세, 경제 지표, 원자재, 암호화폐 가격을 공개 API에서 조회합니다.

pub mod market_data_service;

pub use market_data_service::*;
