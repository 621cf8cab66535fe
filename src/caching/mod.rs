//! 캐싱 계층 모듈
//!
//! 외부 API 응답을 TTL 동안 보관하는 용량 제한 인메모리 캐시를 제공합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::caching::MemoryCache;
//!
//! let cache = MemoryCache::new(Duration::from_secs(300), 1000);
//! cache.set("quote:AAPL", &quote).await;
//!
//! let cached: Option<StockQuote> = cache.get("quote:AAPL").await;
//! ```
//!
//! # 환경 설정
//!
//! ```bash
//! MARKET_CACHE_TTL_SECS=300      # 기본값
//! MARKET_CACHE_MAX_ENTRIES=1000  # 기본값
//! ```

pub mod memory_cache;

pub use memory_cache::*;
