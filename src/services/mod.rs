//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 도메인별로 나뉘어 인증 흐름과 시장 데이터 조회를 담당합니다.
//! 서비스는 생성 시점에 협력자를 주입받으며 [`crate::core::AppState`]가 소유합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::{auth::GoogleAuthService, market::MarketDataService};
//!
//! let quote = state.market.stock_quote("AAPL").await;
//! ```

pub mod auth;
pub mod market;
