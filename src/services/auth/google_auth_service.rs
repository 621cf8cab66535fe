//! # Google OAuth 2.0 콜백 처리 서비스
//!
//! Google 동의 화면에서 돌아온 요청을 처리하여 Identity Backend 세션으로 연결합니다.
//!
//! ## OAuth 2.0 Authorization Code Flow
//!
//! ```text
//! ┌──────────┐          ┌────────────────┐          ┌──────────────┐          ┌──────────────────┐
//! │ Browser  │          │  이 서버        │          │ Google OAuth │          │ Identity Backend │
//! └──────────┘          └────────────────┘          └──────────────┘          └──────────────────┘
//!      │ GET /auth/google       │                          │                           │
//!      ├───────────────────────►│                          │                           │
//!      │ 302 consent URL        │                          │                           │
//!      │◄───────────────────────┤                          │                           │
//!      │ 사용자 동의                                        │                           │
//!      ├──────────────────────────────────────────────────►│                           │
//!      │ GET /auth/google/callback?code=...&state=...      │                           │
//!      ├───────────────────────►│ state 서명 검증          │                           │
//!      │                        │ code → TokenSet (1회)    │                           │
//!      │                        ├─────────────────────────►│                           │
//!      │                        │ id_token 로그인 / 사용자 생성                          │
//!      │                        ├─────────────────────────────────────────────────────►│
//!      │ 302 {app}/?auth=success#access_token=...           │                           │
//!      │◄───────────────────────┤                          │                           │
//! ```
//!
//! ## 실패 처리
//!
//! 콜백은 어떤 경우에도 에러를 그대로 내보내지 않습니다. 모든 실패는
//! [`CallbackFailure`]로 분류되어 `{app}/?error=<code>&message=<text>`로 리다이렉트됩니다.
//!
//! ## 보안 고려사항
//!
//! - 인가 코드는 로그에 원문으로 남기지 않고 SHA-256 지문만 기록합니다
//! - 인가 코드는 요청당 정확히 한 번만 교환합니다
//! - 서명된 `state`가 확인된 요청만 인가 코드를 교환합니다
//! - 모든 외부 호출은 `OUTBOUND_TIMEOUT_SECS` 안에 끝나야 하며 재시도하지 않습니다

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{AppUrlConfig, AuthProvider, SessionHandoff};
use crate::domain::dto::OAuthCallbackQuery;
use crate::domain::models::auth::CallbackFailure;
use crate::domain::models::identity::{IdentityError, IdentitySession, NewIdentity};
use crate::domain::models::oauth::{GoogleUserInfo, IdTokenClaims, TokenSet};
use crate::errors::AppError;
use crate::services::auth::{IdentityBackend, OAuthProvider, OAuthStateSigner};
use crate::utils::string_utils::fingerprint;

/// 콜백 처리 결과. 두 경우 모두 브라우저를 `location`으로 보냅니다.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackOutcome {
    Success { location: String },
    Failure { failure: CallbackFailure, location: String },
}

impl CallbackOutcome {
    pub fn location(&self) -> &str {
        match self {
            CallbackOutcome::Success { location } | CallbackOutcome::Failure { location, .. } => location,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CallbackOutcome::Success { .. })
    }
}

/// 외부 호출 한 단계의 실패 원인
enum StepError<E> {
    Failed(E),
    TimedOut,
}

impl<E: std::fmt::Display> StepError<E> {
    fn describe(&self, timeout: Duration) -> String {
        match self {
            StepError::Failed(e) => e.to_string(),
            StepError::TimedOut => format!("timed out after {}s", timeout.as_secs()),
        }
    }
}

/// Google OAuth 콜백 서비스
///
/// 요청마다 독립적으로 동작하며 공유 가변 상태를 갖지 않습니다.
/// 협력자는 생성 시점에 명시적으로 주입됩니다.
///
/// ## 세션 전달 방식
///
/// | [`SessionHandoff`] | Identity Backend 호출 | 성공 리다이렉트 |
/// |---|---|---|
/// | `IdToken` | `sign_in_with_id_token` | `/?auth=success#access_token=...` |
/// | `Provision` | `create_user` + `sign_in_with_id_token` | `/?auth=success#access_token=...` (ID 토큰이 없으면 `/?auth=success`) |
/// | `MagicLink` | `create_user` + `generate_magic_link` | `/auth/callback?token_hash=...&type=magiclink` |
pub struct GoogleAuthService {
    oauth: Arc<dyn OAuthProvider>,
    identity: Arc<dyn IdentityBackend>,
    state: OAuthStateSigner,
    urls: AppUrlConfig,
    handoff: SessionHandoff,
    timeout: Duration,
}

impl GoogleAuthService {
    pub fn new(
        oauth: Arc<dyn OAuthProvider>,
        identity: Arc<dyn IdentityBackend>,
        state: OAuthStateSigner,
        urls: AppUrlConfig,
        handoff: SessionHandoff,
        timeout: Duration,
    ) -> Self {
        Self {
            oauth,
            identity,
            state,
            urls,
            handoff,
            timeout,
        }
    }

    /// 콜백 요청을 끝까지 처리하고 리다이렉트 위치를 결정합니다.
    ///
    /// 이 메서드는 실패하지 않습니다. 모든 실패는 `CallbackOutcome::Failure`로 반환됩니다.
    pub async fn complete_callback(&self, query: &OAuthCallbackQuery) -> CallbackOutcome {
        match self.run_callback(query).await {
            Ok(location) => {
                log::info!("Google OAuth 콜백 성공 (handoff: {:?})", self.handoff);
                CallbackOutcome::Success { location }
            }
            Err(failure) => {
                log::warn!(
                    "Google OAuth 콜백 실패 [{}]: {}",
                    failure.code(),
                    failure
                );
                let location = self.failure_location(&failure);
                CallbackOutcome::Failure { failure, location }
            }
        }
    }

    async fn run_callback(&self, query: &OAuthCallbackQuery) -> Result<String, CallbackFailure> {
        // 1. 프로바이더 에러 (code가 함께 와도 에러가 우선)
        if let Some(error) = &query.error {
            return Err(CallbackFailure::ProviderDenied {
                error: error.clone(),
                description: query.error_description.clone(),
            });
        }

        // 2. 인가 코드
        let code = query.code.as_deref().ok_or(CallbackFailure::MissingCode)?;
        log::info!("Google OAuth 콜백 수신 (code fp: {})", fingerprint(code));

        // 3. state 검증 (교환 전에)
        self.verify_state(query.state.as_deref())?;

        // 4. 토큰 교환 (정확히 1회)
        let tokens = self.exchange(code).await?;

        // 5. Identity Backend로 신원 전달
        match self.handoff {
            SessionHandoff::IdToken => {
                let session = self.sign_in(&tokens).await?;
                Ok(self.session_location(&session))
            }
            SessionHandoff::Provision => {
                self.provision(&tokens).await?;
                if tokens.id_token.is_none() {
                    // 세션을 만들 수 없으면 성공 표식만 전달하고 브라우저가 안내합니다
                    log::warn!("ID 토큰 없음, 세션 없이 사용자 등록만 완료");
                    return Ok(self.urls.landing_url("/?auth=success"));
                }
                let session = self.sign_in(&tokens).await?;
                Ok(self.session_location(&session))
            }
            SessionHandoff::MagicLink => {
                let profile = self.provision(&tokens).await?;
                self.magic_link_location(&profile.email).await
            }
        }
    }

    fn verify_state(&self, state: Option<&str>) -> Result<(), CallbackFailure> {
        let state = state.ok_or_else(|| CallbackFailure::InvalidState("state is missing".to_string()))?;

        self.state.verify(state).map_err(|e| match e {
            AppError::ConfigurationError(msg) => {
                log::error!("OAuth state 서명 키 누락: {}", msg);
                CallbackFailure::Unexpected(msg)
            }
            other => CallbackFailure::InvalidState(other.to_string()),
        })
    }

    async fn exchange(&self, code: &str) -> Result<TokenSet, CallbackFailure> {
        match self.bounded(self.oauth.exchange_code(code)).await {
            Ok(tokens) => Ok(tokens),
            Err(StepError::Failed(AppError::ConfigurationError(msg))) => {
                log::error!("OAuth 클라이언트 설정 누락: {}", msg);
                Err(CallbackFailure::Unexpected(msg))
            }
            Err(e) => Err(CallbackFailure::ExchangeFailure(e.describe(self.timeout))),
        }
    }

    async fn sign_in(&self, tokens: &TokenSet) -> Result<IdentitySession, CallbackFailure> {
        let id_token = tokens
            .id_token
            .as_deref()
            .ok_or(CallbackFailure::MissingIdToken)?;

        let session = self
            .bounded(self.identity.sign_in_with_id_token(
                AuthProvider::Google,
                id_token,
                Some(&tokens.access_token),
            ))
            .await
            .map_err(|e| CallbackFailure::IdentityFailure(e.describe(self.timeout)))?;

        log::info!(
            "Identity Backend 세션 발급 완료: {}",
            session.email().unwrap_or("<unknown>")
        );
        Ok(session)
    }

    /// 프로필을 파생하여 사용자를 생성합니다. 이미 있는 사용자는 그대로 진행합니다.
    async fn provision(&self, tokens: &TokenSet) -> Result<GoogleUserInfo, CallbackFailure> {
        let profile = self.resolve_profile(tokens).await?;
        let identity = NewIdentity::from_google(&profile);

        match self.bounded(self.identity.create_user(&identity)).await {
            Ok(user) => {
                log::info!("새 Google 사용자 등록: {} ({})", profile.email, user.id);
                Ok(profile)
            }
            Err(StepError::Failed(IdentityError::AlreadyRegistered)) => {
                log::info!("기존 Google 사용자 로그인: {}", profile.email);
                Ok(profile)
            }
            Err(e) => Err(CallbackFailure::IdentityFailure(e.describe(self.timeout))),
        }
    }

    /// ID 토큰 클레임을 우선 사용하고, 없으면 UserInfo 엔드포인트를 조회합니다.
    async fn resolve_profile(&self, tokens: &TokenSet) -> Result<GoogleUserInfo, CallbackFailure> {
        let from_claims = tokens
            .id_token
            .as_deref()
            .and_then(|t| match IdTokenClaims::peek(t) {
                Ok(claims) => claims.into_profile(),
                Err(e) => {
                    log::debug!("ID 토큰 클레임 해석 실패, UserInfo 로 대체: {}", e);
                    None
                }
            });

        if let Some(profile) = from_claims {
            return Ok(profile);
        }

        self.bounded(self.oauth.fetch_user_info(&tokens.access_token))
            .await
            .map_err(|e| CallbackFailure::ExchangeFailure(e.describe(self.timeout)))
    }

    async fn magic_link_location(&self, email: &str) -> Result<String, CallbackFailure> {
        let link = self
            .bounded(self.identity.generate_magic_link(email))
            .await
            .map_err(|e| CallbackFailure::SessionEstablishFailure(e.describe(self.timeout)))?;

        if link.hashed_token.trim().is_empty() {
            return Err(CallbackFailure::SessionEstablishFailure(
                "magic link response had no hashed_token".to_string(),
            ));
        }

        Ok(self.urls.landing_url(&format!(
            "/auth/callback?token_hash={}&type=magiclink",
            urlencoding::encode(&link.hashed_token)
        )))
    }

    /// 세션 토큰은 서버 로그와 Referer에 남지 않도록 프래그먼트로 전달합니다.
    fn session_location(&self, session: &IdentitySession) -> String {
        let mut fragment = format!(
            "access_token={}&refresh_token={}",
            urlencoding::encode(&session.access_token),
            urlencoding::encode(&session.refresh_token)
        );
        if let Some(expires_in) = session.expires_in {
            fragment.push_str(&format!("&expires_in={}", expires_in));
        }
        fragment.push_str("&token_type=bearer");

        self.urls.landing_url(&format!("/?auth=success#{}", fragment))
    }

    fn failure_location(&self, failure: &CallbackFailure) -> String {
        self.urls.landing_url(&format!(
            "/?error={}&message={}",
            failure.code().as_str(),
            urlencoding::encode(&failure.message())
        ))
    }

    async fn bounded<T, E, F>(&self, call: F) -> Result<T, StepError<E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(StepError::Failed(e)),
            Err(_) => Err(StepError::TimedOut),
        }
    }
}
