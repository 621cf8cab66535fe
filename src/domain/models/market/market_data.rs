//! 시세/경제지표 응답 모델
//!
//! 모든 조회 결과는 [`MarketData`]로 감싸져 실시간 값인지 대체 값인지 표시됩니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 데이터 출처
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// 외부 API에서 받은 값
    Live,
    /// 외부 API 실패, API 키 누락 시 사용하는 고정 값
    Fallback,
}

/// 출처와 조회 시각이 붙은 조회 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketData<T> {
    pub data: T,
    pub source: DataSource,
    pub fetched_at: DateTime<Utc>,
}

impl<T> MarketData<T> {
    pub fn live(data: T) -> Self {
        Self {
            data,
            source: DataSource::Live,
            fetched_at: Utc::now(),
        }
    }

    pub fn fallback(data: T) -> Self {
        Self {
            data,
            source: DataSource::Fallback,
            fetched_at: Utc::now(),
        }
    }

    pub fn is_live(&self) -> bool {
        self.source == DataSource::Live
    }
}

/// 주식/ETF 시세
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
    /// `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_trading_day: Option<String>,
}

/// 경제 지표 (CPI 등)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicIndicator {
    pub series_id: String,
    pub value: f64,
    /// 직전 관측치 대비 변화량
    pub change: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// 이름이 붙은 시세 (지수 ETF, 섹터 ETF)
///
/// 종목마다 실시간/대체 여부가 다를 수 있으므로 각자 [`MarketData`]를 가집니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedQuote {
    pub name: String,
    pub quote: MarketData<StockQuote>,
}

/// Alpha Vantage 경제 지표 함수
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroSeries {
    RealGdp,
    TreasuryYield,
    FederalFundsRate,
    Cpi,
    Inflation,
    Unemployment,
    RetailSales,
    NonfarmPayroll,
}

impl MacroSeries {
    pub const ALL: [MacroSeries; 8] = [
        MacroSeries::RealGdp,
        MacroSeries::TreasuryYield,
        MacroSeries::FederalFundsRate,
        MacroSeries::Cpi,
        MacroSeries::Inflation,
        MacroSeries::Unemployment,
        MacroSeries::RetailSales,
        MacroSeries::NonfarmPayroll,
    ];

    /// 대소문자를 구분하지 않고 `function` 이름으로 찾습니다.
    pub fn from_function(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        Self::ALL.into_iter().find(|series| series.function() == upper)
    }

    pub fn function(&self) -> &'static str {
        match self {
            MacroSeries::RealGdp => "REAL_GDP",
            MacroSeries::TreasuryYield => "TREASURY_YIELD",
            MacroSeries::FederalFundsRate => "FEDERAL_FUNDS_RATE",
            MacroSeries::Cpi => "CPI",
            MacroSeries::Inflation => "INFLATION",
            MacroSeries::Unemployment => "UNEMPLOYMENT",
            MacroSeries::RetailSales => "RETAIL_SALES",
            MacroSeries::NonfarmPayroll => "NONFARM_PAYROLL",
        }
    }

    /// `interval` 매개변수. 간격을 받지 않는 함수는 `None`입니다.
    pub fn interval(&self) -> Option<&'static str> {
        match self {
            MacroSeries::RealGdp => Some("annual"),
            MacroSeries::TreasuryYield | MacroSeries::FederalFundsRate | MacroSeries::Cpi => {
                Some("monthly")
            }
            MacroSeries::Inflation
            | MacroSeries::Unemployment
            | MacroSeries::RetailSales
            | MacroSeries::NonfarmPayroll => None,
        }
    }

    /// 응답에 `name`이 없을 때 쓰는 표시 이름
    pub fn display_name(&self) -> &'static str {
        match self {
            MacroSeries::RealGdp => "Real Gross Domestic Product",
            MacroSeries::TreasuryYield => "10-Year Treasury Constant Maturity Rate",
            MacroSeries::FederalFundsRate => "Effective Federal Funds Rate",
            MacroSeries::Cpi => "Consumer Price Index for all Urban Consumers",
            MacroSeries::Inflation => "Inflation - US Consumer Prices",
            MacroSeries::Unemployment => "Unemployment Rate",
            MacroSeries::RetailSales => "Advance Retail Sales: Retail Trade",
            MacroSeries::NonfarmPayroll => "Total Nonfarm Payroll",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            MacroSeries::RealGdp => "billions of dollars",
            MacroSeries::Cpi => "index 1982-1984=100",
            MacroSeries::RetailSales => "millions of dollars",
            MacroSeries::NonfarmPayroll => "thousands of persons",
            MacroSeries::TreasuryYield
            | MacroSeries::FederalFundsRate
            | MacroSeries::Inflation
            | MacroSeries::Unemployment => "percent",
        }
    }
}

/// 이름과 단위가 붙은 경제 지표 관측치
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReading {
    pub function: String,
    pub name: String,
    pub value: f64,
    /// 직전 관측치 대비 변화량
    pub change: f64,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// 일봉 한 개
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// `YYYY-MM-DD`
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

/// 원자재 가격
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommodityPrice {
    pub symbol: String,
    pub price: f64,
}

/// CoinGecko `/coins/markets` 항목
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoAsset {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
}

/// 단일 코인의 USD 가격
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoPrice {
    pub coin_id: String,
    pub usd: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usd_24h_change: Option<f64>,
}

/// 종목 시세와 거시 지표를 함께 묶은 스냅샷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub quote: MarketData<StockQuote>,
    pub cpi: MarketData<EconomicIndicator>,
    pub crude_oil: MarketData<CommodityPrice>,
}
