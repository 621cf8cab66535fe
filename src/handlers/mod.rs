//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들입니다. 핸들러는 요청을 검증하고
//! `web::Data<AppState>`의 서비스를 호출한 뒤 응답으로 변환하는 일만 합니다.
//!
//! ## 아키텍처 위치
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Browser (LucidQuant SPA)
//! └─────────────────────┬───────────────────────┘
//!                       │ HTTP Request/Response
//! ┌─────────────────────▼───────────────────────┐
//!   Handlers (이 모듈)                             ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   Services (auth, market)                      ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   Google OAuth / Identity Backend / 시장 API      ← External
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## 에러 처리
//!
//! 핸들러는 `Result<HttpResponse, AppError>`를 반환하며, `AppError`는
//! `ResponseError`를 통해 `{"error": "..."}` JSON으로 변환됩니다.
//! OAuth 콜백만은 예외로, 모든 결과를 리다이렉트로 돌려줍니다.
//!
//! ```rust,ignore
//! #[get("/quote/{symbol}")]
//! pub async fn stock_quote(
//!     state: web::Data<AppState>,
//!     path: web::Path<SymbolPath>,
//! ) -> Result<HttpResponse, AppError> {
//!     path.validate().map_err(|e| AppError::ValidationError(e.to_string()))?;
//!     Ok(HttpResponse::Ok().json(state.market.stock_quote(&path.normalized()).await))
//! }
//! ```
//!
//! ## 모듈 구성
//!
//! - **`auth`**: Google OAuth 로그인 시작과 콜백
//! - **`market`**: 시장 데이터 조회

pub mod auth;
pub mod market;
