//! # Configuration Module
//!
//! 백엔드 서비스의 설정 관리를 담당하는 모듈입니다.
//! 환경 변수 기반의 설정값을 시작 시 한 번 구조체로 로드하여
//! [`AppState`](crate::core::AppState)를 통해 각 서비스에 주입합니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 서버 바인딩, 프론트엔드 URL, 외부 호출 타임아웃
//! - [`auth_config`] - Google OAuth, Identity Backend, 세션 전달 방식
//! - [`market_config`] - 시세/경제지표 API 키와 캐시 TTL
//!
//! ## 설계 원칙
//!
//! ### 1. 환경 분리 (Environment Separation)
//!
//! 프로덕션에서는 공개 도메인, 그 외 환경에서는 로컬 프론트엔드로 리다이렉트합니다.
//!
//! ### 2. 늦은 실패 (Fail on Use)
//!
//! 자격 증명이 없어도 서버는 기동됩니다. 해당 값이 필요한 요청에서
//! `AppError::ConfigurationError`로 보고되어 배포 결함과 런타임 에러가 구분됩니다.
//!
//! ### 3. 시크릿 마스킹
//!
//! 시크릿을 담는 설정 구조체의 `Debug` 출력은 값을 `***`로 가립니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::config::{AppUrlConfig, GoogleOAuthConfig, ServerConfig};
//!
//! let urls = AppUrlConfig::from_env();
//! let google = GoogleOAuthConfig::from_env(&urls);
//! println!("Server will bind to {}:{}", ServerConfig::host(), ServerConfig::port());
//! ```
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 서버 설정
//! export HOST="0.0.0.0"
//! export PORT="8080"
//! export OUTBOUND_TIMEOUT_SECS="10"
//!
//! # 환경 설정
//! export ENVIRONMENT="production"  # development(기본값), test, staging, production
//! export APP_BASE_URL_PRODUCTION="https://lucidquant.in"
//! export APP_BASE_URL_LOCAL="http://localhost:3000"
//!
//! # Google OAuth
//! export GOOGLE_CLIENT_ID="your-client-id"
//! export GOOGLE_CLIENT_SECRET="your-client-secret"
//! export OAUTH_STATE_SECRET="state-signing-key"  # 선택, 기본값은 GOOGLE_CLIENT_SECRET
//!
//! # Identity Backend
//! export SUPABASE_URL="https://your-project.supabase.co"
//! export SUPABASE_SERVICE_ROLE_KEY="service-role-key"
//! ```

pub mod auth_config;
pub mod data_config;
pub mod market_config;

/// 환경 변수를 앞뒤 공백을 제거하여 읽습니다. 빈 값은 미설정으로 취급합니다.
pub(crate) fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub use auth_config::*;
pub use data_config::*;
pub use market_config::*;
