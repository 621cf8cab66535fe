//! # Session Client
//!
//! 브라우저 측에서 익명 키로 Identity Backend와 통신하는 세션 클라이언트입니다.
//! 발급받은 세션은 클라이언트 내부 저장소에 보관되며, 페이지 재진입 시
//! [`SessionClient::current_session`]으로 복원됩니다.
//!
//! ## PKCE 로그인
//!
//! ```text
//! start_pkce_sign_in ──► verifier 보관, challenge(S256)가 담긴 인가 URL 반환
//!        │
//!        ▼  (브라우저 이동, 프로바이더 동의)
//! {redirect_to}?code=... ──► exchange_code_for_session(code, 보관된 verifier)
//! ```
//!
//! 세션이 설정되거나 폐기될 때마다 [`AuthChangeEvent`]가 구독자에게 전달됩니다.

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Serialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use tokio::sync::{broadcast, RwLock};
use url::Url;
use uuid::Uuid;

use crate::config::{AuthProvider, IdentityBackendConfig};
use crate::domain::models::identity::{IdentityError, IdentitySession, IdentityUser};

/// 세션 변경 이벤트
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthChangeEvent {
    SignedIn,
    SignedOut,
}

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// PKCE code verifier (64자 16진수, 무작위 244비트)
pub fn generate_code_verifier() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// `S256` code challenge: `BASE64URL(SHA256(verifier))`, 패딩 없음
pub fn pkce_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// 브라우저 측 세션 연산
#[async_trait]
pub trait SessionClient: Send + Sync {
    /// URL 프래그먼트로 받은 토큰으로 세션을 설정합니다.
    async fn set_session(&self, session: IdentitySession) -> Result<IdentitySession, IdentityError>;

    /// 인가 코드를 세션으로 교환합니다 (PKCE).
    async fn exchange_code_for_session(&self, code: &str) -> Result<IdentitySession, IdentityError>;

    /// 매직 링크 해시 토큰을 검증하여 세션을 받습니다.
    async fn verify_magic_link(&self, token_hash: &str) -> Result<IdentitySession, IdentityError>;

    /// 보관 중인 세션
    async fn current_session(&self) -> Result<Option<IdentitySession>, IdentityError>;

    /// 세션을 폐기합니다.
    async fn sign_out(&self) -> Result<(), IdentityError>;

    /// PKCE 로그인을 시작합니다. code verifier를 보관하고 브라우저가 이동할 인가 URL을 반환합니다.
    async fn start_pkce_sign_in(&self, redirect_to: &str) -> Result<String, IdentityError>;

    /// 세션 변경 이벤트를 구독합니다.
    fn subscribe(&self) -> broadcast::Receiver<AuthChangeEvent>;
}

/// Supabase GoTrue 브라우저 세션 클라이언트
pub struct SupabaseSessionClient {
    http: reqwest::Client,
    config: IdentityBackendConfig,
    stored: RwLock<Option<IdentitySession>>,
    code_verifier: RwLock<Option<String>>,
    events: broadcast::Sender<AuthChangeEvent>,
}

impl SupabaseSessionClient {
    pub fn new(http: reqwest::Client, config: IdentityBackendConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            http,
            config,
            stored: RwLock::new(None),
            code_verifier: RwLock::new(None),
            events,
        }
    }

    fn url(&self, base_url: &str, path: &str) -> String {
        format!("{}{}", base_url, path)
    }

    async fn post_public<B>(&self, path: &str, body: &B) -> Result<IdentitySession, IdentityError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let (base_url, key) = self.config.public_endpoint()?;

        let response = self
            .http
            .post(self.url(base_url, path))
            .header("apikey", key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityError::from_response(status.as_u16(), &body));
        }

        Ok(response.json::<IdentitySession>().await?)
    }

    /// 액세스 토큰의 소유자를 조회합니다. 토큰이 유효하지 않으면 거부됩니다.
    async fn fetch_user(&self, access_token: &str) -> Result<IdentityUser, IdentityError> {
        let (base_url, key) = self.config.public_endpoint()?;

        let response = self
            .http
            .get(self.url(base_url, "/auth/v1/user"))
            .header("apikey", key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityError::from_response(status.as_u16(), &body));
        }

        Ok(response.json::<IdentityUser>().await?)
    }

    async fn store(&self, session: IdentitySession) -> IdentitySession {
        *self.stored.write().await = Some(session.clone());
        // 구독자가 없으면 보낼 곳이 없을 뿐입니다
        let _ = self.events.send(AuthChangeEvent::SignedIn);
        session
    }
}

#[async_trait]
impl SessionClient for SupabaseSessionClient {
    async fn set_session(&self, mut session: IdentitySession) -> Result<IdentitySession, IdentityError> {
        if session.user.is_none() {
            session.user = Some(self.fetch_user(&session.access_token).await?);
        }

        Ok(self.store(session).await)
    }

    async fn exchange_code_for_session(&self, code: &str) -> Result<IdentitySession, IdentityError> {
        let verifier = self.code_verifier.write().await.take().ok_or_else(|| {
            IdentityError::Misconfigured("no PKCE code verifier was stored for this sign-in".to_string())
        })?;

        let body = json!({
            "auth_code": code,
            "code_verifier": verifier,
        });
        let session = self.post_public("/auth/v1/token?grant_type=pkce", &body).await?;

        Ok(self.store(session).await)
    }

    async fn verify_magic_link(&self, token_hash: &str) -> Result<IdentitySession, IdentityError> {
        let body = json!({
            "type": "magiclink",
            "token_hash": token_hash,
        });
        let session = self.post_public("/auth/v1/verify", &body).await?;

        Ok(self.store(session).await)
    }

    async fn current_session(&self) -> Result<Option<IdentitySession>, IdentityError> {
        Ok(self.stored.read().await.clone())
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        let Some(session) = self.stored.read().await.clone() else {
            return Ok(());
        };
        let (base_url, key) = self.config.public_endpoint()?;

        let response = self
            .http
            .post(self.url(base_url, "/auth/v1/logout"))
            .header("apikey", key)
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        // 이미 만료된 토큰이면 서버 측 세션도 없으므로 로컬 정리만 진행
        let status = response.status();
        if !status.is_success() && status != reqwest::StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityError::from_response(status.as_u16(), &body));
        }

        *self.stored.write().await = None;
        let _ = self.events.send(AuthChangeEvent::SignedOut);
        Ok(())
    }

    async fn start_pkce_sign_in(&self, redirect_to: &str) -> Result<String, IdentityError> {
        let (base_url, _) = self.config.public_endpoint()?;
        let mut url = Url::parse(&self.url(base_url, "/auth/v1/authorize"))
            .map_err(|e| IdentityError::Misconfigured(format!("invalid SUPABASE_URL: {}", e)))?;

        let verifier = generate_code_verifier();
        url.query_pairs_mut()
            .append_pair("provider", AuthProvider::Google.as_str())
            .append_pair("redirect_to", redirect_to)
            .append_pair("code_challenge", &pkce_challenge(&verifier))
            .append_pair("code_challenge_method", "s256");

        // 이전에 시작한 로그인의 verifier는 덮어씁니다
        *self.code_verifier.write().await = Some(verifier);
        log::debug!("PKCE 로그인 시작 (redirect_to: {})", redirect_to);

        Ok(url.to_string())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChangeEvent> {
        self.events.subscribe()
    }
}
