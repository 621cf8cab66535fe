//! # 인메모리 TTL 캐시
//!
//! 외부 시장 데이터 응답을 짧은 시간 동안 보관하는 프로세스 로컬 캐시입니다.
//! 값은 JSON으로 직렬화되어 저장되므로 서로 다른 타입을 하나의 캐시에 넣을 수 있습니다.
//!
//! ## 만료와 용량
//!
//! [`moka::future::Cache`] 위에 구성됩니다. 항목은 저장 후 `ttl`이 지나면 만료되고,
//! `max_capacity`를 넘으면 자주 쓰이지 않는 항목부터 제거됩니다.
//! 다시 조회되지 않는 키도 캐시의 유지 작업에서 정리됩니다.

use std::time::Duration;

use moka::future::Cache;
use serde::{de::DeserializeOwned, Serialize};

/// TTL과 용량 제한이 있는 인메모리 캐시
///
/// ## 사용 예제
///
/// ```rust,ignore
/// use std::time::Duration;
/// use crate::caching::MemoryCache;
///
/// let cache = MemoryCache::new(Duration::from_secs(300), 1000);
/// cache.set("quote:AAPL", &quote).await;
///
/// let cached: Option<StockQuote> = cache.get("quote:AAPL").await;
/// ```
pub struct MemoryCache {
    entries: Cache<String, serde_json::Value>,
}

impl MemoryCache {
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self { entries }
    }

    /// 캐시에서 값을 조회합니다.
    ///
    /// 키가 없거나, 만료되었거나, 요청한 타입으로 역직렬화할 수 없으면 `None`입니다.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.entries.get(key).await?;

        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("캐시 값 역직렬화 실패 ({}): {}", key, e);
                None
            }
        }
    }

    /// 값을 저장합니다. 같은 키의 기존 값과 만료 시각은 덮어씁니다.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(json) => self.entries.insert(key.to_string(), json).await,
            Err(e) => log::warn!("캐시 값 직렬화 실패 ({}): {}", key, e),
        }
    }

    /// 대기 중인 만료/제거 작업을 반영한 뒤의 항목 수
    #[cfg(test)]
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}
