//! LucidQuant 백엔드
//!
//! Google OAuth 2.0 로그인 게이트웨이와 시장 데이터 API를 제공하는 서비스입니다.
//! 사용자 계정과 세션은 외부 Identity Backend(Supabase GoTrue 호환)가 관리하며,
//! 이 서버는 OAuth 콜백을 처리하여 그쪽 세션으로 연결하는 역할을 합니다.
//!
//! # Features
//!
//! - **OAuth 2.0**: Google 동의 화면 URL 생성, 콜백 처리, 세션 전달
//! - **실패 분류**: 모든 콜백 실패를 고정된 에러 코드로 리다이렉트
//! - **브라우저 측 상태**: URL 인증 신호 처리, 세션 저장소, 콘텐츠 게이트
//! - **시장 데이터**: 주식 시세, CPI, 원유, 암호화폐 (대체 값과 TTL 캐시)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청 검증 / 응답 변환
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 콜백 상태 머신, 시장 데이터
//! └─────────────────┘
//!          │
//!          ▼
//! ┌──────────────────────────────────────────┐
//! │ Google OAuth · Identity Backend · 시장 API │ ← 외부 시스템
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use lucidquant_backend::core::AppState;
//! use lucidquant_backend::routes::configure_all_routes;
//!
//! let state = web::Data::new(AppState::from_env()?);
//! let app = App::new().app_data(state).configure(configure_all_routes);
//! ```

pub mod caching;
pub mod client;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod utils;
