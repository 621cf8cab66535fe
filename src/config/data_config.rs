//! 서버 및 실행 환경 설정 관리 모듈
//!
//! 실행 환경, 서버 바인딩, 프론트엔드 URL, 외부 호출 타임아웃 설정을 관리합니다.

use std::env;
use std::time::Duration;

use super::non_empty_var;

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 개발 환경 - 로컬 프론트엔드로 리다이렉트
    Development,
    /// 테스트 환경 - 자동화된 테스트용 설정
    Test,
    /// 스테이징 환경 - 프로덕션 유사 환경
    Staging,
    /// 프로덕션 환경 - 공개 도메인으로 리다이렉트
    Production,
}

impl Environment {
    /// 현재 실행 환경을 감지합니다.
    ///
    /// `ENVIRONMENT` 또는 `NODE_ENV` 환경 변수를 확인하며,
    /// 설정되지 않은 경우 `Development`를 기본값으로 사용합니다.
    /// 공개 도메인 리다이렉트는 명시적으로 `production`을 지정해야 켜집니다.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let env = Environment::current();
    /// if env.is_production() {
    ///     println!("https://lucidquant.in 으로 리다이렉트");
    /// }
    /// ```
    pub fn current() -> Self {
        match non_empty_var("ENVIRONMENT").or_else(|| non_empty_var("NODE_ENV")) {
            Some(raw) => Self::from_str(&raw),
            None => Environment::Development,
        }
    }

    /// 문자열에서 Environment를 생성합니다.
    ///
    /// 알 수 없는 값인 경우 경고 후 `Development`를 반환합니다.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            "development" | "dev" | "local" => Environment::Development,
            other => {
                log::warn!("알 수 없는 실행 환경 '{}', development 로 간주", other);
                Environment::Development
            }
        }
    }

    /// 공개 도메인을 사용하는 환경인지 여부
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// 서버 바인딩 설정
pub struct ServerConfig;

impl ServerConfig {
    /// 서버가 바인딩할 포트를 반환합니다.
    ///
    /// # Environment Variables
    ///
    /// - `PORT`: 커스텀 포트 설정 (기본값: 8080)
    pub fn port() -> u16 {
        env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080)
    }

    /// 서버가 바인딩할 호스트 주소를 반환합니다.
    ///
    /// # Environment Variables
    ///
    /// - `HOST`: 커스텀 호스트 설정 (기본값: "0.0.0.0")
    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
    }

    /// 외부 API 호출 1회당 최대 대기 시간
    ///
    /// OAuth 토큰 엔드포인트, Identity Backend, 시세 API 호출 모두에 적용됩니다.
    ///
    /// # Environment Variables
    ///
    /// - `OUTBOUND_TIMEOUT_SECS`: 초 단위 (기본값: 10)
    pub fn outbound_timeout() -> Duration {
        let secs = env::var("OUTBOUND_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(10);

        Duration::from_secs(secs)
    }
}

/// 프론트엔드 애플리케이션 URL 설정
///
/// 실행 환경에 따라 프로덕션 도메인과 로컬 개발 서버 중 하나를 선택합니다.
/// OAuth 리다이렉트 URI와 콜백 완료 후 이동할 랜딩 URL이 모두 이 값에서 파생됩니다.
///
/// | 환경 | 기본 URL |
/// |------|----------|
/// | Production | `https://lucidquant.in` |
/// | 그 외 | `http://localhost:3000` |
#[derive(Debug, Clone, PartialEq)]
pub struct AppUrlConfig {
    /// 프론트엔드 기본 URL (끝의 `/` 제거됨)
    pub base_url: String,
    /// OAuth 콜백 경로
    pub callback_path: String,
}

impl AppUrlConfig {
    pub const DEFAULT_PRODUCTION_BASE: &'static str = "https://lucidquant.in";
    pub const DEFAULT_LOCAL_BASE: &'static str = "http://localhost:3000";
    pub const DEFAULT_CALLBACK_PATH: &'static str = "/auth/google/callback";

    pub fn new(base_url: impl Into<String>, callback_path: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let mut callback_path = callback_path.into();
        if !callback_path.starts_with('/') {
            callback_path.insert(0, '/');
        }

        Self { base_url, callback_path }
    }

    /// 환경 변수에서 현재 환경에 맞는 URL 설정을 로드합니다.
    ///
    /// # Environment Variables
    ///
    /// - `APP_BASE_URL_PRODUCTION`
    /// - `APP_BASE_URL_LOCAL`
    /// - `OAUTH_CALLBACK_PATH`
    pub fn from_env() -> Self {
        Self::for_environment(&Environment::current())
    }

    pub fn for_environment(environment: &Environment) -> Self {
        let base_url = if environment.is_production() {
            env::var("APP_BASE_URL_PRODUCTION")
                .unwrap_or_else(|_| Self::DEFAULT_PRODUCTION_BASE.to_string())
        } else {
            env::var("APP_BASE_URL_LOCAL")
                .unwrap_or_else(|_| Self::DEFAULT_LOCAL_BASE.to_string())
        };
        let callback_path = env::var("OAUTH_CALLBACK_PATH")
            .unwrap_or_else(|_| Self::DEFAULT_CALLBACK_PATH.to_string());

        Self::new(base_url, callback_path)
    }

    /// OAuth 프로바이더에 등록된 리다이렉트 URI
    pub fn callback_url(&self) -> String {
        format!("{}{}", self.base_url, self.callback_path)
    }

    /// 기본 URL 아래의 랜딩 경로를 절대 URL로 만듭니다.
    pub fn landing_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_string() {
        assert_eq!(Environment::from_str("development"), Environment::Development);
        assert_eq!(Environment::from_str("local"), Environment::Development);
        assert_eq!(Environment::from_str("test"), Environment::Test);
        assert_eq!(Environment::from_str("production"), Environment::Production);
        assert_eq!(Environment::from_str("PROD"), Environment::Production);
        assert_eq!(Environment::from_str("unknown"), Environment::Development);
    }

    #[test]
    fn test_app_url_normalizes_slashes() {
        let urls = AppUrlConfig::new("https://lucidquant.in/", "auth/google/callback");

        assert_eq!(urls.base_url, "https://lucidquant.in");
        assert_eq!(urls.callback_url(), "https://lucidquant.in/auth/google/callback");
        assert_eq!(urls.landing_url("/"), "https://lucidquant.in/");
        assert_eq!(urls.landing_url("auth/callback"), "https://lucidquant.in/auth/callback");
    }

    #[test]
    fn test_server_config_defaults() {
        if env::var("PORT").is_err() {
            assert_eq!(ServerConfig::port(), 8080);
        }

        if env::var("OUTBOUND_TIMEOUT_SECS").is_err() {
            assert_eq!(ServerConfig::outbound_timeout(), Duration::from_secs(10));
        }
    }
}
