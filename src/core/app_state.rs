//! # Application State
//!
//! 서버가 시작될 때 한 번 구성되어 `web::Data`로 모든 핸들러에 공유되는 상태입니다.
//! 외부 시스템 클라이언트는 여기서 명시적으로 생성되어 서비스에 주입됩니다.
//!
//! ## 구성 순서
//!
//! ```text
//! 환경 변수 ──► 설정 구조체 ──► reqwest::Client (타임아웃) ──► 클라이언트 ──► 서비스 ──► AppState
//! ```
//!
//! 필수 자격 증명이 없어도 서버는 시작됩니다. 해당 기능을 호출하는 시점에
//! `ConfigurationError`로 보고됩니다.

use std::sync::Arc;

use crate::config::{
    AppUrlConfig, GoogleOAuthConfig, IdentityBackendConfig, MarketDataConfig, ServerConfig,
    SessionHandoff,
};
use crate::errors::{AppResult, ErrorContext};
use crate::services::auth::{
    AuthorizationInitiator, GoogleAuthService, GoogleOAuthClient, OAuthStateSigner,
    SupabaseAdminClient,
};
use crate::services::market::MarketDataService;

pub struct AppState {
    pub initiator: AuthorizationInitiator,
    pub google_auth: GoogleAuthService,
    pub market: MarketDataService,
    pub urls: AppUrlConfig,
}

impl AppState {
    pub fn new(
        initiator: AuthorizationInitiator,
        google_auth: GoogleAuthService,
        market: MarketDataService,
        urls: AppUrlConfig,
    ) -> Self {
        Self {
            initiator,
            google_auth,
            market,
            urls,
        }
    }

    /// 환경 변수로부터 전체 상태를 구성합니다.
    pub fn from_env() -> AppResult<Self> {
        let timeout = ServerConfig::outbound_timeout();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("HTTP 클라이언트 생성 실패")?;

        let urls = AppUrlConfig::from_env();
        let google = GoogleOAuthConfig::from_env(&urls);
        let identity = IdentityBackendConfig::from_env();
        let handoff = SessionHandoff::from_env();

        log::info!("앱 기본 URL: {}", urls.base_url);
        log::info!("OAuth 콜백 URL: {}", google.redirect_uri);
        log::info!("세션 전달 방식: {:?}", handoff);
        log::info!("외부 호출 타임아웃: {}s", timeout.as_secs());
        if google.state_secret.is_none() {
            log::info!("OAUTH_STATE_SECRET 미설정, GOOGLE_CLIENT_SECRET 으로 state 서명");
        }

        let google_auth = GoogleAuthService::new(
            Arc::new(GoogleOAuthClient::new(http.clone(), google.clone())),
            Arc::new(SupabaseAdminClient::new(http.clone(), identity)),
            OAuthStateSigner::from_config(&google),
            urls.clone(),
            handoff,
            timeout,
        );

        Ok(Self::new(
            AuthorizationInitiator::new(google),
            google_auth,
            MarketDataService::new(http, MarketDataConfig::from_env(), timeout),
            urls,
        ))
    }

    /// CORS에 허용할 프론트엔드 Origin 목록
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins = vec![self.urls.base_url.clone()];
        for local in [AppUrlConfig::DEFAULT_LOCAL_BASE, "http://127.0.0.1:3000"] {
            if !origins.iter().any(|o| o == local) {
                origins.push(local.to_string());
            }
        }
        origins
    }
}
