//! 시장 데이터 API 설정
//!
//! API 키가 없는 공급자는 네트워크 호출 없이 대체 값을 반환합니다.
//!
//! ```bash
//! export ALPHA_VANTAGE_API_KEY="..."
//! export FRED_API_KEY="..."
//! export POLYGON_API_KEY="..."
//! export MARKET_CACHE_TTL_SECS="300"
//! export MARKET_CACHE_MAX_ENTRIES="1000"
//! ```

use std::time::Duration;

use super::non_empty_var;

#[derive(Clone)]
pub struct MarketDataConfig {
    pub alpha_vantage_key: Option<String>,
    pub fred_key: Option<String>,
    pub polygon_key: Option<String>,
    pub alpha_vantage_base: String,
    pub fred_base: String,
    pub polygon_base: String,
    pub coingecko_base: String,
    /// 실시간 응답 캐시 유지 시간
    pub cache_ttl: Duration,
    /// 캐시에 보관할 최대 항목 수
    pub cache_max_entries: u64,
}

impl MarketDataConfig {
    pub const ALPHA_VANTAGE_BASE: &'static str = "https://www.alphavantage.co/query";
    pub const FRED_BASE: &'static str = "https://api.stlouisfed.org/fred";
    pub const POLYGON_BASE: &'static str = "https://api.polygon.io";
    pub const COINGECKO_BASE: &'static str = "https://api.coingecko.com/api/v3";
    pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
    pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 1000;

    pub fn from_env() -> Self {
        let cache_ttl_secs = non_empty_var("MARKET_CACHE_TTL_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(Self::DEFAULT_CACHE_TTL_SECS);
        let cache_max_entries = non_empty_var("MARKET_CACHE_MAX_ENTRIES")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(Self::DEFAULT_CACHE_MAX_ENTRIES);

        let config = Self {
            alpha_vantage_key: non_empty_var("ALPHA_VANTAGE_API_KEY"),
            fred_key: non_empty_var("FRED_API_KEY"),
            polygon_key: non_empty_var("POLYGON_API_KEY"),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            cache_max_entries,
            ..Self::without_keys()
        };

        log::info!(
            "Market data keys - alpha_vantage: {}, fred: {}, polygon: {}",
            config.alpha_vantage_key.is_some(),
            config.fred_key.is_some(),
            config.polygon_key.is_some()
        );

        config
    }

    /// 키 없이 공개 엔드포인트 기본값만 가진 설정
    pub fn without_keys() -> Self {
        Self {
            alpha_vantage_key: None,
            fred_key: None,
            polygon_key: None,
            alpha_vantage_base: Self::ALPHA_VANTAGE_BASE.to_string(),
            fred_base: Self::FRED_BASE.to_string(),
            polygon_base: Self::POLYGON_BASE.to_string(),
            coingecko_base: Self::COINGECKO_BASE.to_string(),
            cache_ttl: Duration::from_secs(Self::DEFAULT_CACHE_TTL_SECS),
            cache_max_entries: Self::DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

impl std::fmt::Debug for MarketDataConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketDataConfig")
            .field("alpha_vantage_key", &self.alpha_vantage_key.as_ref().map(|_| "***"))
            .field("fred_key", &self.fred_key.as_ref().map(|_| "***"))
            .field("polygon_key", &self.polygon_key.as_ref().map(|_| "***"))
            .field("cache_ttl", &self.cache_ttl)
            .field("cache_max_entries", &self.cache_max_entries)
            .finish()
    }
}
