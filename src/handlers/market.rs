//! Market Data HTTP Handlers
//!
//! 모든 응답은 `{"data": ..., "source": "live" | "fallback", "fetched_at": ...}` 형태입니다.
use actix_web::{get, web, HttpResponse};
use validator::Validate;

use crate::core::AppState;
use crate::domain::dto::{CoinPath, IndicatorPath, SymbolPath, TopCryptoQuery};
use crate::errors::AppError;

/// 주식/ETF 시세
///
/// # Endpoint
/// `GET /api/v1/market/quote/{symbol}`
#[get("/quote/{symbol}")]
pub async fn stock_quote(
    state: web::Data<AppState>,
    path: web::Path<SymbolPath>,
) -> Result<HttpResponse, AppError> {
    path.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let quote = state.market.stock_quote(&path.normalized()).await;
    Ok(HttpResponse::Ok().json(quote))
}

/// `GET /api/v1/market/cpi`
#[get("/cpi")]
pub async fn cpi(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.market.cpi().await)
}

/// `GET /api/v1/market/crude-oil`
#[get("/crude-oil")]
pub async fn crude_oil(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.market.crude_oil().await)
}

/// 시가총액 상위 코인
///
/// # Endpoint
/// `GET /api/v1/market/crypto/top?limit={1..=100}`
#[get("/crypto/top")]
pub async fn top_cryptos(
    state: web::Data<AppState>,
    query: web::Query<TopCryptoQuery>,
) -> Result<HttpResponse, AppError> {
    query.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(state.market.top_cryptos(query.limit).await))
}

/// 단일 코인 가격. 조회할 수 없으면 404입니다.
///
/// # Endpoint
/// `GET /api/v1/market/crypto/{coin_id}`
#[get("/crypto/{coin_id}")]
pub async fn crypto_price(
    state: web::Data<AppState>,
    path: web::Path<CoinPath>,
) -> Result<HttpResponse, AppError> {
    path.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let price = state.market.crypto_price(&path.coin_id).await?;
    Ok(HttpResponse::Ok().json(price))
}

/// 주요 지수 ETF 시세. 응답은 `[{"name": "S&P 500", "quote": {...}}, ...]` 입니다.
///
/// # Endpoint
/// `GET /api/v1/market/indices`
#[get("/indices")]
pub async fn market_summary(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.market.market_summary().await)
}

/// `GET /api/v1/market/sectors`
#[get("/sectors")]
pub async fn sector_performance(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.market.sector_performance().await)
}

/// 경제 지표
///
/// # Endpoint
/// `GET /api/v1/market/indicator/{function}` (`REAL_GDP`, `INFLATION`, `UNEMPLOYMENT` 등)
#[get("/indicator/{function}")]
pub async fn economic_indicator(
    state: web::Data<AppState>,
    path: web::Path<IndicatorPath>,
) -> Result<HttpResponse, AppError> {
    path.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    let series = path
        .series()
        .ok_or_else(|| AppError::ValidationError(format!("Unknown indicator: {}", path.function)))?;

    Ok(HttpResponse::Ok().json(state.market.economic_indicator(series).await))
}

/// 최근 일봉 (최신순)
///
/// # Endpoint
/// `GET /api/v1/market/daily/{symbol}`
#[get("/daily/{symbol}")]
pub async fn daily_series(
    state: web::Data<AppState>,
    path: web::Path<SymbolPath>,
) -> Result<HttpResponse, AppError> {
    path.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(state.market.daily_series(&path.normalized()).await))
}

/// 종목 시세와 CPI, 원유 가격 스냅샷
///
/// # Endpoint
/// `GET /api/v1/market/snapshot/{symbol}`
#[get("/snapshot/{symbol}")]
pub async fn snapshot(
    state: web::Data<AppState>,
    path: web::Path<SymbolPath>,
) -> Result<HttpResponse, AppError> {
    path.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(state.market.snapshot(&path.normalized()).await))
}
