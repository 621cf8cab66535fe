//! API 라우트 설정 모듈
//!
//! HTTP 엔드포인트들을 기능별로 그룹화하여 등록합니다.
//!
//! # Route Groups
//!
//! | Scope | 내용 |
//! |-------|------|
//! | `/health` | 헬스체크 |
//! | `/auth` | Google OAuth 로그인 시작과 콜백 |
//! | `/api/v1/market` | 시장 데이터 조회 |
//!
//! # Examples
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//!
//! let app = App::new()
//!     .app_data(web::Data::new(state))
//!     .configure(configure_all_routes);
//! ```

use crate::handlers;
use actix_web::web;
use serde_json::json;

/// 모든 라우트를 설정합니다
///
/// 기능별로 분할된 라우트들을 통합하여 애플리케이션에 등록합니다.
/// 핸들러는 `web::Data<AppState>`가 등록되어 있다고 가정합니다.
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    // Health check endpoint
    cfg.service(health_check);

    // Feature-specific routes
    configure_auth_routes(cfg);
    configure_market_routes(cfg);
}

/// 인증 관련 라우트를 설정합니다
///
/// 콜백 경로는 Google Cloud Console에 등록된 리다이렉트 URI와 같아야 합니다.
///
/// # Available Routes
///
/// - `GET /auth/google` - 동의 화면으로 리다이렉트
/// - `GET /auth/google/url` - 동의 화면 URL (JSON)
/// - `GET /auth/google/callback` - OAuth 콜백
///
/// # Examples
///
/// ```bash
/// # Google OAuth 시작
/// curl -i http://localhost:8080/auth/google
///
/// # SPA용 URL 조회
/// curl http://localhost:8080/auth/google/url
/// ```
fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(handlers::auth::google_login)
            .service(handlers::auth::google_login_url)
            .service(handlers::auth::google_oauth_callback),
    );
}

/// 시장 데이터 라우트를 설정합니다
///
/// `/crypto/top`은 `/crypto/{coin_id}`보다 먼저 등록되어야 합니다.
///
/// # Examples
///
/// ```bash
/// curl http://localhost:8080/api/v1/market/quote/AAPL
/// curl "http://localhost:8080/api/v1/market/crypto/top?limit=5"
/// curl http://localhost:8080/api/v1/market/indicator/UNEMPLOYMENT
/// ```
fn configure_market_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/market")
            .service(handlers::market::stock_quote)
            .service(handlers::market::cpi)
            .service(handlers::market::crude_oil)
            .service(handlers::market::top_cryptos)
            .service(handlers::market::crypto_price)
            .service(handlers::market::snapshot)
            .service(handlers::market::market_summary)
            .service(handlers::market::sector_performance)
            .service(handlers::market::economic_indicator)
            .service(handlers::market::daily_series),
    );
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// # Examples
///
/// ```bash
/// curl http://localhost:8080/health
/// ```
///
/// Response:
/// ```json
/// {
///   "status": "healthy",
///   "service": "lucidquant_backend",
///   "version": "0.1.0",
///   "timestamp": "2024-01-01T00:00:00Z",
///   "features": {
///     "auth": "Google OAuth 2.0",
///     "identity_backend": "Supabase",
///     "cache": "In-memory TTL (moka)"
///   }
/// }
/// ```
#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "features": {
            "auth": "Google OAuth 2.0",
            "identity_backend": "Supabase",
            "cache": "In-memory TTL (moka)"
        }
    }))
}
