//! 시장 데이터 요청 DTO
//!
//! 경로/쿼리 매개변수는 외부 API URL에 그대로 들어가므로 허용 문자를 제한합니다.

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::models::market::MacroSeries;

/// `/quote/{symbol}`, `/snapshot/{symbol}` 경로 매개변수
#[derive(Debug, Deserialize, Validate)]
pub struct SymbolPath {
    #[validate(
        length(min = 1, max = 10, message = "symbol must be 1 to 10 characters"),
        custom(function = "validate_symbol")
    )]
    pub symbol: String,
}

impl SymbolPath {
    /// 외부 API 조회용 대문자 심볼
    pub fn normalized(&self) -> String {
        self.symbol.to_uppercase()
    }
}

/// `/crypto/{coin_id}` 경로 매개변수
#[derive(Debug, Deserialize, Validate)]
pub struct CoinPath {
    #[validate(
        length(min = 1, max = 64, message = "coin_id must be 1 to 64 characters"),
        custom(function = "validate_coin_id")
    )]
    pub coin_id: String,
}

/// `/indicator/{function}` 경로 매개변수
#[derive(Debug, Deserialize, Validate)]
pub struct IndicatorPath {
    #[validate(custom(function = "validate_indicator"))]
    pub function: String,
}

impl IndicatorPath {
    /// 검증을 통과한 뒤에만 `Some`입니다.
    pub fn series(&self) -> Option<MacroSeries> {
        MacroSeries::from_function(&self.function)
    }
}

/// `/crypto/top?limit=` 쿼리
#[derive(Debug, Deserialize, Validate)]
pub struct TopCryptoQuery {
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    10
}

/// 심볼은 영문, 숫자, `.`, `-` 만 허용합니다 (예: `BRK.B`, `BF-B`).
fn validate_symbol(symbol: &str) -> Result<(), ValidationError> {
    if !symbol
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ValidationError::new("invalid_symbol")
            .with_message("symbol may only contain letters, digits, '.' and '-'".into()));
    }
    Ok(())
}

fn validate_indicator(function: &str) -> Result<(), ValidationError> {
    if MacroSeries::from_function(function).is_none() {
        return Err(ValidationError::new("unknown_indicator").with_message(
            "function must be one of REAL_GDP, TREASURY_YIELD, FEDERAL_FUNDS_RATE, CPI, INFLATION, \
             UNEMPLOYMENT, RETAIL_SALES, NONFARM_PAYROLL"
                .into(),
        ));
    }
    Ok(())
}

/// CoinGecko id는 소문자, 숫자, `-` 로 구성됩니다.
fn validate_coin_id(coin_id: &str) -> Result<(), ValidationError> {
    if !coin_id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ValidationError::new("invalid_coin_id")
            .with_message("coin_id may only contain lowercase letters, digits and '-'".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(s: &str) -> SymbolPath {
        SymbolPath { symbol: s.to_string() }
    }

    #[test]
    fn test_symbol_validation() {
        assert!(symbol("AAPL").validate().is_ok());
        assert!(symbol("brk.b").validate().is_ok());
        assert!(symbol("BF-B").validate().is_ok());

        assert!(symbol("").validate().is_err());
        assert!(symbol("ABCDEFGHIJK").validate().is_err());
        assert!(symbol("AAPL&apikey=x").validate().is_err());
        assert!(symbol("A B").validate().is_err());
    }

    #[test]
    fn test_symbol_normalized() {
        assert_eq!(symbol("nvda").normalized(), "NVDA");
    }

    #[test]
    fn test_coin_id_validation() {
        assert!(CoinPath { coin_id: "bitcoin".into() }.validate().is_ok());
        assert!(CoinPath { coin_id: "matic-network".into() }.validate().is_ok());
        assert!(CoinPath { coin_id: "Bitcoin".into() }.validate().is_err());
        assert!(CoinPath { coin_id: "btc,eth".into() }.validate().is_err());
    }

    #[test]
    fn test_indicator_validation() {
        let path = IndicatorPath { function: "inflation".into() };
        assert!(path.validate().is_ok());
        assert_eq!(path.series(), Some(MacroSeries::Inflation));

        assert!(IndicatorPath { function: "GDP".into() }.validate().is_err());
        assert!(IndicatorPath { function: "CPI&apikey=x".into() }.validate().is_err());
    }

    #[test]
    fn test_top_crypto_limit_range() {
        assert!(TopCryptoQuery { limit: 1 }.validate().is_ok());
        assert!(TopCryptoQuery { limit: 100 }.validate().is_ok());
        assert!(TopCryptoQuery { limit: 0 }.validate().is_err());
        assert!(TopCryptoQuery { limit: 101 }.validate().is_err());
    }
}
