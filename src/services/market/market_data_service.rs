//! # 시장 데이터 서비스
//!
//! 공개 시장 데이터 API를 감싸는 요청/응답 래퍼입니다.
//!
//! | 연산 | 공급자 | 대체 값 |
//! |------|--------|---------|
//! | [`MarketDataService::stock_quote`] | Alpha Vantage `GLOBAL_QUOTE` | 종목별 기준가, 변화량 0 |
//! | [`MarketDataService::cpi`] | FRED `CPIAUCSL` | 310.3 (변화량 0.3) |
//! | [`MarketDataService::crude_oil`] | Polygon `CL` 전일 종가 | 75.0 |
//! | [`MarketDataService::top_cryptos`] | CoinGecko `/coins/markets` | 빈 목록 |
//! | [`MarketDataService::crypto_price`] | CoinGecko `/simple/price` | 없음 (404) |
//! | [`MarketDataService::market_summary`] | Alpha Vantage `GLOBAL_QUOTE` × 4 지수 ETF | 종목별 시세 대체 값 |
//! | [`MarketDataService::sector_performance`] | Alpha Vantage `GLOBAL_QUOTE` × 9 섹터 ETF | 종목별 시세 대체 값 |
//! | [`MarketDataService::economic_indicator`] | Alpha Vantage 경제 지표 함수 | 지표별 고정 값, 변화량 0 |
//! | [`MarketDataService::daily_series`] | Alpha Vantage `TIME_SERIES_DAILY` | 빈 목록 |
//!
//! 외부 호출이 실패하거나 API 키가 없으면 대체 값을 `source: "fallback"`으로 반환합니다.
//! 실시간 값만 캐시되며, 대체 값은 캐시하지 않으므로 다음 요청에서 다시 시도합니다.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use futures_util::future::{join3, join_all};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::caching::MemoryCache;
use crate::config::MarketDataConfig;
use crate::domain::models::market::{
    CommodityPrice, CryptoAsset, CryptoPrice, DailyBar, EconomicIndicator, IndicatorReading,
    MacroSeries, MarketData, MarketSnapshot, NamedQuote, StockQuote,
};
use crate::errors::{AppError, AppResult, ErrorContext};

pub const CPI_SERIES_ID: &str = "CPIAUCSL";
pub const CRUDE_OIL_TICKER: &str = "CL";

const FALLBACK_CPI: f64 = 310.3;
const FALLBACK_CPI_CHANGE: f64 = 0.3;
const FALLBACK_CRUDE_OIL: f64 = 75.0;
const DEFAULT_BASE_PRICE: f64 = 100.0;

/// Alpha Vantage가 HTTP 200으로 돌려주는 에러 본문 키
const ALPHA_VANTAGE_ERROR_KEYS: [&str; 3] = ["Error Message", "Note", "Information"];

/// 주요 지수를 추종하는 ETF
pub const INDEX_ETFS: [(&str, &str); 4] = [
    ("SPY", "S&P 500"),
    ("QQQ", "NASDAQ 100"),
    ("DIA", "Dow Jones"),
    ("IWM", "Russell 2000"),
];

/// SPDR 섹터 ETF
pub const SECTOR_ETFS: [(&str, &str); 9] = [
    ("XLF", "Financials"),
    ("XLK", "Technology"),
    ("XLE", "Energy"),
    ("XLV", "Healthcare"),
    ("XLI", "Industrials"),
    ("XLU", "Utilities"),
    ("XLB", "Materials"),
    ("XLP", "Consumer Staples"),
    ("XLY", "Consumer Discretionary"),
];

/// 종목별 대체 기준가
fn base_price(symbol: &str) -> f64 {
    match symbol.to_uppercase().as_str() {
        "AAPL" => 185.0,
        "TSLA" => 240.0,
        "NVDA" => 450.0,
        "MSFT" => 340.0,
        "GOOGL" => 140.0,
        "AMZN" => 135.0,
        "META" => 320.0,
        "SPY" => 450.0,
        "QQQ" => 380.0,
        "DIA" => 350.0,
        "IWM" => 190.0,
        _ => DEFAULT_BASE_PRICE,
    }
}

fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

pub fn fallback_quote(symbol: &str) -> StockQuote {
    StockQuote {
        symbol: symbol.to_uppercase(),
        price: base_price(symbol),
        change: 0.0,
        change_percent: 0.0,
        volume: None,
        latest_trading_day: Some(today()),
    }
}

pub fn fallback_cpi() -> EconomicIndicator {
    EconomicIndicator {
        series_id: CPI_SERIES_ID.to_string(),
        value: FALLBACK_CPI,
        change: FALLBACK_CPI_CHANGE,
        date: Some(today()),
    }
}

/// 경제 지표별 고정 대체 값
pub fn fallback_indicator(series: MacroSeries) -> IndicatorReading {
    let value = match series {
        MacroSeries::RealGdp => 22000.0,
        MacroSeries::TreasuryYield => 4.2,
        MacroSeries::FederalFundsRate => 5.33,
        MacroSeries::Cpi => FALLBACK_CPI,
        MacroSeries::Inflation => 3.0,
        MacroSeries::Unemployment => 4.0,
        MacroSeries::RetailSales => 700000.0,
        MacroSeries::NonfarmPayroll => 157000.0,
    };

    IndicatorReading {
        function: series.function().to_string(),
        name: series.display_name().to_string(),
        value,
        change: 0.0,
        unit: series.unit().to_string(),
        date: Some(today()),
    }
}

pub fn fallback_crude_oil() -> CommodityPrice {
    CommodityPrice {
        symbol: CRUDE_OIL_TICKER.to_string(),
        price: FALLBACK_CRUDE_OIL,
    }
}

/// Alpha Vantage 숫자 필드는 문자열로 옵니다 (`"189.8400"`, `"1.2345%"`).
fn number_field(quote: &Value, key: &str) -> AppResult<f64> {
    quote
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().trim_end_matches('%'))
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| AppError::ExternalServiceError(format!("Alpha Vantage 응답에 {} 없음", key)))
}

/// HTTP 200 본문에 담긴 Alpha Vantage 에러(잘못된 호출, 호출 한도)를 실패로 바꿉니다.
fn check_alpha_vantage_errors(body: &Value) -> AppResult<()> {
    for key in ALPHA_VANTAGE_ERROR_KEYS {
        if let Some(message) = body.get(key).and_then(Value::as_str) {
            return Err(AppError::ExternalServiceError(format!(
                "Alpha Vantage {}: {}",
                key, message
            )));
        }
    }
    Ok(())
}

/// `GLOBAL_QUOTE` 응답을 해석합니다.
pub fn parse_global_quote(body: &Value, requested_symbol: &str) -> AppResult<StockQuote> {
    check_alpha_vantage_errors(body)?;

    // 존재하지 않는 심볼이면 빈 객체가 옵니다
    let quote = body
        .get("Global Quote")
        .filter(|q| q.as_object().is_some_and(|o| !o.is_empty()))
        .ok_or_else(|| AppError::ExternalServiceError("Alpha Vantage 응답에 시세 없음".to_string()))?;

    Ok(StockQuote {
        symbol: quote
            .get("01. symbol")
            .and_then(Value::as_str)
            .unwrap_or(requested_symbol)
            .to_string(),
        price: number_field(quote, "05. price")?,
        change: number_field(quote, "09. change")?,
        change_percent: number_field(quote, "10. change percent")?,
        volume: quote
            .get("06. volume")
            .and_then(Value::as_str)
            .and_then(|v| v.parse().ok()),
        latest_trading_day: quote
            .get("07. latest trading day")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// Alpha Vantage 경제 지표 응답 (`{"name","unit","data":[{"date","value"}]}`, 최신순)
///
/// 값이 `"."`인 관측치는 건너뜁니다.
pub fn parse_economic_indicator(body: &Value, series: MacroSeries) -> AppResult<IndicatorReading> {
    check_alpha_vantage_errors(body)?;

    let points = body
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::ExternalServiceError("Alpha Vantage 응답에 data 없음".to_string()))?;

    let mut values = points.iter().filter_map(|p| {
        let value = p.get("value")?.as_str()?.trim().parse::<f64>().ok()?;
        let date = p.get("date").and_then(Value::as_str).map(str::to_string);
        Some((value, date))
    });

    let (latest, date) = values.next().ok_or_else(|| {
        AppError::ExternalServiceError(format!("{} 관측치 없음", series.function()))
    })?;
    let change = values.next().map(|(previous, _)| latest - previous).unwrap_or(0.0);

    fn text(body: &Value, key: &str, default: &str) -> String {
        body.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(default)
            .to_string()
    }

    Ok(IndicatorReading {
        function: series.function().to_string(),
        name: text(body, "name", series.display_name()),
        value: latest,
        change,
        unit: text(body, "unit", series.unit()),
        date,
    })
}

/// `TIME_SERIES_DAILY` 응답을 최신 날짜가 앞에 오도록 해석합니다.
pub fn parse_daily_series(body: &Value) -> AppResult<Vec<DailyBar>> {
    check_alpha_vantage_errors(body)?;

    let series = body
        .get("Time Series (Daily)")
        .and_then(Value::as_object)
        .ok_or_else(|| AppError::ExternalServiceError("Alpha Vantage 응답에 일봉 없음".to_string()))?;

    let mut bars = series
        .iter()
        .map(|(date, bar)| -> AppResult<DailyBar> {
            Ok(DailyBar {
                date: date.clone(),
                open: number_field(bar, "1. open")?,
                high: number_field(bar, "2. high")?,
                low: number_field(bar, "3. low")?,
                close: number_field(bar, "4. close")?,
                volume: bar
                    .get("5. volume")
                    .and_then(Value::as_str)
                    .and_then(|v| v.parse().ok()),
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    // YYYY-MM-DD 는 문자열 순서가 날짜 순서와 같습니다
    bars.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(bars)
}

/// FRED `series/observations` (최신순) 응답을 해석합니다.
///
/// 값이 `"."`인 관측치(미발표)는 건너뜁니다. 직전 관측치가 없으면 변화량은 0입니다.
pub fn parse_fred_observations(body: &Value, series_id: &str) -> AppResult<EconomicIndicator> {
    let observations = body
        .get("observations")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::ExternalServiceError("FRED 응답에 observations 없음".to_string()))?;

    let mut values = observations.iter().filter_map(|o| {
        let value = o.get("value")?.as_str()?.parse::<f64>().ok()?;
        let date = o.get("date").and_then(Value::as_str).map(str::to_string);
        Some((value, date))
    });

    let (latest, date) = values
        .next()
        .ok_or_else(|| AppError::ExternalServiceError("FRED 관측치 없음".to_string()))?;
    let change = values.next().map(|(previous, _)| latest - previous).unwrap_or(0.0);

    Ok(EconomicIndicator {
        series_id: series_id.to_string(),
        value: latest,
        change,
        date,
    })
}

/// Polygon `/v2/aggs/ticker/{ticker}/prev` 응답의 종가를 꺼냅니다.
pub fn parse_polygon_prev(body: &Value, ticker: &str) -> AppResult<CommodityPrice> {
    let close = body
        .get("results")
        .and_then(Value::as_array)
        .and_then(|r| r.first())
        .and_then(|r| r.get("c"))
        .and_then(Value::as_f64)
        .ok_or_else(|| AppError::ExternalServiceError("Polygon 응답에 종가 없음".to_string()))?;

    Ok(CommodityPrice {
        symbol: ticker.to_string(),
        price: close,
    })
}

/// CoinGecko `/simple/price` 응답 (`{"bitcoin":{"usd":64000,"usd_24h_change":-1.2}}`)
pub fn parse_simple_price(body: &Value, coin_id: &str) -> AppResult<CryptoPrice> {
    let entry = body
        .get(coin_id)
        .ok_or_else(|| AppError::NotFound(format!("Unknown coin: {}", coin_id)))?;

    let usd = entry
        .get("usd")
        .and_then(Value::as_f64)
        .ok_or_else(|| AppError::NotFound(format!("No USD price for coin: {}", coin_id)))?;

    Ok(CryptoPrice {
        coin_id: coin_id.to_string(),
        usd,
        usd_24h_change: entry.get("usd_24h_change").and_then(Value::as_f64),
    })
}

/// 시장 데이터 조회 서비스
pub struct MarketDataService {
    http: reqwest::Client,
    config: MarketDataConfig,
    cache: MemoryCache,
    timeout: Duration,
}

impl MarketDataService {
    pub fn new(http: reqwest::Client, config: MarketDataConfig, timeout: Duration) -> Self {
        let cache = MemoryCache::new(config.cache_ttl, config.cache_max_entries);
        Self {
            http,
            config,
            cache,
            timeout,
        }
    }

    pub async fn stock_quote(&self, symbol: &str) -> MarketData<StockQuote> {
        let symbol = symbol.to_uppercase();
        let fetch = async {
            let key = Self::required_key(&self.config.alpha_vantage_key, "ALPHA_VANTAGE_API_KEY")?;
            let body = self
                .get_json(
                    &self.config.alpha_vantage_base,
                    &[("function", "GLOBAL_QUOTE"), ("symbol", symbol.as_str()), ("apikey", key)],
                )
                .await?;
            parse_global_quote(&body, &symbol)
        };

        self.cached_or_fallback(&format!("quote:{}", symbol), fetch, || fallback_quote(&symbol))
            .await
    }

    pub async fn cpi(&self) -> MarketData<EconomicIndicator> {
        let fetch = async {
            let key = Self::required_key(&self.config.fred_key, "FRED_API_KEY")?;
            let body = self
                .get_json(
                    &format!("{}/series/observations", self.config.fred_base),
                    &[
                        ("series_id", CPI_SERIES_ID),
                        ("api_key", key),
                        ("file_type", "json"),
                        ("limit", "2"),
                        ("sort_order", "desc"),
                    ],
                )
                .await?;
            parse_fred_observations(&body, CPI_SERIES_ID)
        };

        self.cached_or_fallback("fred:CPIAUCSL", fetch, fallback_cpi).await
    }

    pub async fn crude_oil(&self) -> MarketData<CommodityPrice> {
        let fetch = async {
            let key = Self::required_key(&self.config.polygon_key, "POLYGON_API_KEY")?;
            let body = self
                .get_json(
                    &format!("{}/v2/aggs/ticker/{}/prev", self.config.polygon_base, CRUDE_OIL_TICKER),
                    &[("adjusted", "true"), ("apikey", key)],
                )
                .await?;
            parse_polygon_prev(&body, CRUDE_OIL_TICKER)
        };

        self.cached_or_fallback("polygon:CL", fetch, fallback_crude_oil).await
    }

    /// 시가총액 상위 코인 (`limit`은 1..=100으로 검증된 값)
    pub async fn top_cryptos(&self, limit: u32) -> MarketData<Vec<CryptoAsset>> {
        let per_page = limit.to_string();
        let fetch = async {
            let body = self
                .get_json(
                    &format!("{}/coins/markets", self.config.coingecko_base),
                    &[
                        ("vs_currency", "usd"),
                        ("order", "market_cap_desc"),
                        ("per_page", per_page.as_str()),
                        ("page", "1"),
                        ("sparkline", "false"),
                    ],
                )
                .await?;
            serde_json::from_value::<Vec<CryptoAsset>>(body).external("CoinGecko 응답 파싱 실패")
        };

        self.cached_or_fallback(&format!("coingecko:top:{}", limit), fetch, Vec::new)
            .await
    }

    /// 단일 코인 가격. 대체 값이 없으므로 조회 실패는 `NotFound`입니다.
    pub async fn crypto_price(&self, coin_id: &str) -> AppResult<MarketData<CryptoPrice>> {
        let cache_key = format!("coingecko:price:{}", coin_id);
        if let Some(cached) = self.cache.get::<MarketData<CryptoPrice>>(&cache_key).await {
            return Ok(cached);
        }

        let fetch = async {
            let body = self
                .get_json(
                    &format!("{}/simple/price", self.config.coingecko_base),
                    &[
                        ("ids", coin_id),
                        ("vs_currencies", "usd"),
                        ("include_24hr_change", "true"),
                    ],
                )
                .await?;
            parse_simple_price(&body, coin_id)
        };

        match fetch.await {
            Ok(price) => {
                let data = MarketData::live(price);
                self.cache.set(&cache_key, &data).await;
                Ok(data)
            }
            Err(e) => {
                log::warn!("코인 가격 조회 실패 ({}): {}", coin_id, e);
                Err(AppError::NotFound(format!("No price available for coin: {}", coin_id)))
            }
        }
    }

    /// 주요 지수 ETF 시세를 동시에 조회합니다. 순서는 [`INDEX_ETFS`]와 같습니다.
    pub async fn market_summary(&self) -> Vec<NamedQuote> {
        self.named_quotes(&INDEX_ETFS).await
    }

    /// 섹터 ETF 시세를 동시에 조회합니다. 순서는 [`SECTOR_ETFS`]와 같습니다.
    pub async fn sector_performance(&self) -> Vec<NamedQuote> {
        self.named_quotes(&SECTOR_ETFS).await
    }

    async fn named_quotes(&self, symbols: &[(&str, &str)]) -> Vec<NamedQuote> {
        join_all(symbols.iter().map(|(symbol, name)| async move {
            NamedQuote {
                name: name.to_string(),
                quote: self.stock_quote(symbol).await,
            }
        }))
        .await
    }

    /// Alpha Vantage 경제 지표
    pub async fn economic_indicator(&self, series: MacroSeries) -> MarketData<IndicatorReading> {
        let fetch = async {
            let key = Self::required_key(&self.config.alpha_vantage_key, "ALPHA_VANTAGE_API_KEY")?;
            let mut query = vec![("function", series.function()), ("apikey", key)];
            if let Some(interval) = series.interval() {
                query.push(("interval", interval));
            }
            let body = self.get_json(&self.config.alpha_vantage_base, &query).await?;
            parse_economic_indicator(&body, series)
        };

        self.cached_or_fallback(&format!("indicator:{}", series.function()), fetch, || {
            fallback_indicator(series)
        })
        .await
    }

    /// 최근 일봉 (최신순)
    pub async fn daily_series(&self, symbol: &str) -> MarketData<Vec<DailyBar>> {
        let symbol = symbol.to_uppercase();
        let fetch = async {
            let key = Self::required_key(&self.config.alpha_vantage_key, "ALPHA_VANTAGE_API_KEY")?;
            let body = self
                .get_json(
                    &self.config.alpha_vantage_base,
                    &[
                        ("function", "TIME_SERIES_DAILY"),
                        ("symbol", symbol.as_str()),
                        ("outputsize", "compact"),
                        ("apikey", key),
                    ],
                )
                .await?;
            parse_daily_series(&body)
        };

        self.cached_or_fallback(&format!("daily:{}", symbol), fetch, Vec::new)
            .await
    }

    /// 종목 시세와 CPI, 원유 가격을 동시에 조회합니다.
    pub async fn snapshot(&self, symbol: &str) -> MarketSnapshot {
        let (quote, cpi, crude_oil) =
            join3(self.stock_quote(symbol), self.cpi(), self.crude_oil()).await;

        MarketSnapshot { quote, cpi, crude_oil }
    }

    fn required_key<'a>(key: &'a Option<String>, name: &str) -> AppResult<&'a str> {
        key.as_deref()
            .ok_or_else(|| AppError::ConfigurationError(format!("{} not set", name)))
    }

    /// GET 요청을 보내고 JSON 본문을 반환합니다. URL은 API 키를 포함하므로 로그에 남기지 않습니다.
    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> AppResult<Value> {
        let request = async {
            let response = self
                .http
                .get(url)
                .query(query)
                .send()
                .await
                .external("시장 데이터 요청 실패")?;

            let status = response.status();
            if !status.is_success() {
                return Err(AppError::ExternalServiceError(format!(
                    "시장 데이터 API 응답 오류: HTTP {}",
                    status.as_u16()
                )));
            }

            response.json::<Value>().await.external("시장 데이터 응답 파싱 실패")
        };

        tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| {
                AppError::ExternalServiceError(format!(
                    "시장 데이터 요청 시간 초과 ({}s)",
                    self.timeout.as_secs()
                ))
            })?
    }

    async fn cached_or_fallback<T, F, D>(&self, cache_key: &str, fetch: F, fallback: D) -> MarketData<T>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = AppResult<T>>,
        D: FnOnce() -> T,
    {
        if let Some(cached) = self.cache.get::<MarketData<T>>(cache_key).await {
            log::debug!("시장 데이터 캐시 적중: {}", cache_key);
            return cached;
        }

        match fetch.await {
            Ok(value) => {
                let data = MarketData::live(value);
                self.cache.set(cache_key, &data).await;
                data
            }
            Err(AppError::ConfigurationError(msg)) => {
                log::debug!("{} 대체 값 사용: {}", cache_key, msg);
                MarketData::fallback(fallback())
            }
            Err(e) => {
                log::warn!("{} 조회 실패, 대체 값 사용: {}", cache_key, e);
                MarketData::fallback(fallback())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::market::DataSource;
    use serde_json::json;

    const UNREACHABLE: &str = "http://127.0.0.1:9";

    fn offline_config() -> MarketDataConfig {
        MarketDataConfig {
            alpha_vantage_base: UNREACHABLE.to_string(),
            fred_base: UNREACHABLE.to_string(),
            polygon_base: UNREACHABLE.to_string(),
            coingecko_base: UNREACHABLE.to_string(),
            ..MarketDataConfig::without_keys()
        }
    }

    fn service(config: MarketDataConfig) -> MarketDataService {
        MarketDataService::new(reqwest::Client::new(), config, Duration::from_secs(2))
    }

    #[test]
    fn test_parse_global_quote() {
        let body = json!({
            "Global Quote": {
                "01. symbol": "AAPL",
                "05. price": "189.8400",
                "06. volume": "52845123",
                "07. latest trading day": "2024-05-03",
                "09. change": "-1.1600",
                "10. change percent": "-0.6073%"
            }
        });

        let quote = parse_global_quote(&body, "AAPL").unwrap();
        assert_eq!(quote.price, 189.84);
        assert_eq!(quote.change, -1.16);
        assert_eq!(quote.change_percent, -0.6073);
        assert_eq!(quote.volume, Some(52845123));
        assert_eq!(quote.latest_trading_day.as_deref(), Some("2024-05-03"));
    }

    #[test]
    fn test_alpha_vantage_soft_errors_are_failures() {
        for body in [
            json!({"Error Message": "Invalid API call."}),
            json!({"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}),
            json!({"Information": "The **demo** API key is for demo purposes only."}),
            json!({"Global Quote": {}}),
        ] {
            assert!(matches!(
                parse_global_quote(&body, "AAPL"),
                Err(AppError::ExternalServiceError(_))
            ));
        }
    }

    #[test]
    fn test_parse_fred_observations() {
        let body = json!({
            "observations": [
                {"date": "2024-03-01", "value": "312.230"},
                {"date": "2024-02-01", "value": "311.054"}
            ]
        });

        let cpi = parse_fred_observations(&body, CPI_SERIES_ID).unwrap();
        assert_eq!(cpi.value, 312.23);
        assert!((cpi.change - 1.176).abs() < 1e-9);
        assert_eq!(cpi.date.as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn test_fred_skips_missing_values() {
        let body = json!({
            "observations": [
                {"date": "2024-04-01", "value": "."},
                {"date": "2024-03-01", "value": "312.230"}
            ]
        });

        let cpi = parse_fred_observations(&body, CPI_SERIES_ID).unwrap();
        assert_eq!(cpi.value, 312.23);
        assert_eq!(cpi.change, 0.0);
    }

    #[test]
    fn test_parse_polygon_prev() {
        let body = json!({"ticker": "CL", "results": [{"c": 78.42, "o": 77.9}], "status": "OK"});
        assert_eq!(parse_polygon_prev(&body, "CL").unwrap().price, 78.42);

        let empty = json!({"ticker": "CL", "resultsCount": 0, "status": "OK"});
        assert!(parse_polygon_prev(&empty, "CL").is_err());
    }

    #[test]
    fn test_parse_simple_price() {
        let body = json!({"bitcoin": {"usd": 64000.5, "usd_24h_change": -1.25}});

        let price = parse_simple_price(&body, "bitcoin").unwrap();
        assert_eq!(price.usd, 64000.5);
        assert_eq!(price.usd_24h_change, Some(-1.25));

        assert!(matches!(parse_simple_price(&json!({}), "nocoin"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_fallback_table() {
        assert_eq!(fallback_quote("aapl").price, 185.0);
        assert_eq!(fallback_quote("QQQ").price, 380.0);
        assert_eq!(fallback_quote("ZZZZ").price, 100.0);
        assert_eq!(fallback_quote("TSLA").change, 0.0);
        assert_eq!(fallback_cpi().value, 310.3);
        assert_eq!(fallback_crude_oil().price, 75.0);
    }

    #[test]
    fn test_parse_economic_indicator() {
        let body = json!({
            "name": "Unemployment Rate",
            "interval": "monthly",
            "unit": "percent",
            "data": [
                {"date": "2024-04-01", "value": "3.9"},
                {"date": "2024-03-01", "value": "3.8"}
            ]
        });

        let reading = parse_economic_indicator(&body, MacroSeries::Unemployment).unwrap();
        assert_eq!(reading.function, "UNEMPLOYMENT");
        assert_eq!(reading.name, "Unemployment Rate");
        assert_eq!(reading.value, 3.9);
        assert!((reading.change - 0.1).abs() < 1e-9);
        assert_eq!(reading.unit, "percent");
        assert_eq!(reading.date.as_deref(), Some("2024-04-01"));
    }

    #[test]
    fn test_economic_indicator_defaults_and_errors() {
        let body = json!({"data": [{"date": "2024-01-01", "value": "."}, {"date": "2023-01-01", "value": "4.1"}]});
        let reading = parse_economic_indicator(&body, MacroSeries::Inflation).unwrap();
        assert_eq!(reading.name, "Inflation - US Consumer Prices");
        assert_eq!(reading.unit, "percent");
        assert_eq!(reading.value, 4.1);
        assert_eq!(reading.change, 0.0);

        assert!(parse_economic_indicator(&json!({"data": []}), MacroSeries::Cpi).is_err());
        assert!(parse_economic_indicator(
            &json!({"Information": "rate limit"}),
            MacroSeries::Cpi
        )
        .is_err());
    }

    #[test]
    fn test_parse_daily_series_newest_first() {
        let body = json!({
            "Meta Data": {"2. Symbol": "IBM"},
            "Time Series (Daily)": {
                "2024-05-02": {"1. open": "166.00", "2. high": "166.50", "3. low": "164.20", "4. close": "165.50", "5. volume": "3000000"},
                "2024-05-03": {"1. open": "165.60", "2. high": "167.10", "3. low": "165.10", "4. close": "166.80", "5. volume": "2500000"}
            }
        });

        let bars = parse_daily_series(&body).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, "2024-05-03");
        assert_eq!(bars[0].close, 166.8);
        assert_eq!(bars[1].volume, Some(3000000));

        let broken = json!({"Time Series (Daily)": {"2024-05-03": {"1. open": "x"}}});
        assert!(parse_daily_series(&broken).is_err());
    }

    #[actix_web::test]
    async fn test_summary_and_sectors_keep_order_and_names() {
        let svc = service(offline_config());

        let summary = svc.market_summary().await;
        let names: Vec<&str> = summary.iter().map(|q| q.name.as_str()).collect();
        assert_eq!(names, vec!["S&P 500", "NASDAQ 100", "Dow Jones", "Russell 2000"]);
        assert_eq!(summary[2].quote.data.symbol, "DIA");
        assert_eq!(summary[0].quote.data.price, 450.0);

        let sectors = svc.sector_performance().await;
        assert_eq!(sectors.len(), 9);
        assert_eq!(sectors[1].name, "Technology");
        assert_eq!(sectors[1].quote.data.symbol, "XLK");
        assert!(sectors.iter().all(|s| s.quote.source == DataSource::Fallback));
    }

    #[actix_web::test]
    async fn test_named_quotes_mix_live_and_fallback() {
        let svc = service(offline_config());
        let live = MarketData::live(StockQuote {
            symbol: "QQQ".to_string(),
            price: 440.1,
            change: 2.0,
            change_percent: 0.46,
            volume: None,
            latest_trading_day: None,
        });
        svc.cache.set("quote:QQQ", &live).await;

        let summary = svc.market_summary().await;

        assert_eq!(summary[1].quote, live);
        assert_eq!(summary[0].quote.source, DataSource::Fallback);
    }

    #[actix_web::test]
    async fn test_indicator_and_daily_fallbacks() {
        let svc = service(offline_config());

        let rate = svc.economic_indicator(MacroSeries::FederalFundsRate).await;
        assert_eq!(rate.source, DataSource::Fallback);
        assert_eq!(rate.data.value, 5.33);
        assert_eq!(rate.data.unit, "percent");
        assert_eq!(svc.economic_indicator(MacroSeries::Unemployment).await.data.value, 4.0);

        let daily = svc.daily_series("ibm").await;
        assert_eq!(daily.source, DataSource::Fallback);
        assert!(daily.data.is_empty());
        assert_eq!(svc.cache.len().await, 0);
    }

    #[actix_web::test]
    async fn test_missing_keys_use_fallback_without_caching() {
        let svc = service(offline_config());

        let quote = svc.stock_quote("nvda").await;
        assert_eq!(quote.source, DataSource::Fallback);
        assert_eq!(quote.data.symbol, "NVDA");
        assert_eq!(quote.data.price, 450.0);

        assert_eq!(svc.cpi().await.data.value, 310.3);
        assert_eq!(svc.crude_oil().await.data.price, 75.0);
        assert_eq!(svc.cache.len().await, 0);
    }

    #[actix_web::test]
    async fn test_unreachable_upstream_falls_back() {
        let svc = service(MarketDataConfig {
            alpha_vantage_key: Some("demo".to_string()),
            ..offline_config()
        });

        let quote = svc.stock_quote("MSFT").await;
        assert!(!quote.is_live());
        assert_eq!(quote.data.price, 340.0);

        let top = svc.top_cryptos(5).await;
        assert_eq!(top.source, DataSource::Fallback);
        assert!(top.data.is_empty());
    }

    #[actix_web::test]
    async fn test_cached_live_value_is_served() {
        let svc = service(offline_config());
        let live = MarketData::live(StockQuote {
            symbol: "AAPL".to_string(),
            price: 189.84,
            change: 1.0,
            change_percent: 0.5,
            volume: None,
            latest_trading_day: None,
        });
        svc.cache.set("quote:AAPL", &live).await;

        let quote = svc.stock_quote("aapl").await;
        assert_eq!(quote, live);
    }

    #[actix_web::test]
    async fn test_crypto_price_unavailable_is_not_found() {
        let svc = service(offline_config());

        let result = svc.crypto_price("bitcoin").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[actix_web::test]
    async fn test_snapshot_combines_fallbacks() {
        let svc = service(offline_config());

        let snapshot = svc.snapshot("SPY").await;
        assert_eq!(snapshot.quote.data.price, 450.0);
        assert_eq!(snapshot.cpi.data.change, 0.3);
        assert_eq!(snapshot.crude_oil.data.symbol, "CL");
    }
}
