//! Authentication HTTP Handlers
//!
//! Google OAuth 2.0 로그인 흐름의 HTTP 엔드포인트입니다.
//!
//! # Endpoints
//!
//! - `GET /auth/google`: 동의 화면으로 302 리다이렉트
//! - `GET /auth/google/url`: 동의 화면 URL을 JSON으로 반환
//! - `GET /auth/google/callback`: 콜백 처리 후 프론트엔드로 302 리다이렉트
use actix_web::{get, http::header, web, HttpResponse};

use crate::core::AppState;
use crate::domain::dto::{OAuthCallbackQuery, OAuthLoginUrlResponse};
use crate::errors::AppError;

/// Google 로그인 시작
///
/// 클라이언트 자격 증명이 없으면 500 `{"error": ...}` 를 반환합니다.
///
/// # Endpoint
/// `GET /auth/google`
#[get("/google")]
pub async fn google_login(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let login_url = state.initiator.consent_url()?;

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, login_url))
        .finish())
}

/// Google 로그인 URL 조회
///
/// SPA가 직접 `window.location`을 바꾸는 경우에 사용합니다.
///
/// # Endpoint
/// `GET /auth/google/url`
#[get("/google/url")]
pub async fn google_login_url(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let login_url = state.initiator.consent_url()?;

    Ok(HttpResponse::Ok().json(OAuthLoginUrlResponse { login_url }))
}

/// Google OAuth 콜백
///
/// 성공과 실패 모두 프론트엔드로 302 리다이렉트됩니다.
///
/// # Endpoint
/// `GET /auth/google/callback?code={code}&state={state}`
#[get("/google/callback")]
pub async fn google_oauth_callback(
    state: web::Data<AppState>,
    query: web::Query<OAuthCallbackQuery>,
) -> HttpResponse {
    let outcome = state.google_auth.complete_callback(&query).await;

    HttpResponse::Found()
        .insert_header((header::LOCATION, outcome.location()))
        .finish()
}
