//! 시장 데이터 도메인 모델

pub mod market_data;

pub use market_data::*;
