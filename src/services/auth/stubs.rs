//! 테스트용 협력자 스텁
//!
//! 외부 OAuth 프로바이더, Identity Backend, 세션 클라이언트를 메모리 안에서 흉내냅니다.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::AuthProvider;
use crate::domain::models::identity::{
    IdentityError, IdentitySession, IdentityUser, MagicLink, NewIdentity, UserMetadata,
};
use crate::domain::models::oauth::{GoogleUserInfo, IdTokenClaims, TokenSet};
use crate::errors::AppError;
use crate::services::auth::{AuthChangeEvent, IdentityBackend, OAuthProvider, SessionClient};

pub const STUB_EMAIL: &str = "trader@example.com";
pub const VALID_CODE: &str = "validcode123";

pub fn stub_id_token(email: &str) -> String {
    let claims = serde_json::json!({
        "sub": "108234567890",
        "email": email,
        "email_verified": true,
        "name": "Lucid Trader",
        "picture": "https://example.com/avatar.png",
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"stub")).unwrap()
}

/// 한 번 사용한 코드를 무효화하는 OAuth 프로바이더
pub struct StubOAuthProvider {
    valid_codes: Mutex<HashSet<String>>,
    pub email: String,
    pub include_id_token: bool,
    pub user_info_fails: bool,
    pub delay: Option<Duration>,
    pub exchange_calls: Mutex<usize>,
    pub user_info_calls: Mutex<usize>,
}

impl StubOAuthProvider {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            valid_codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
            email: STUB_EMAIL.to_string(),
            include_id_token: true,
            user_info_fails: false,
            delay: None,
            exchange_calls: Mutex::new(0),
            user_info_calls: Mutex::new(0),
        }
    }

    pub fn exchange_count(&self) -> usize {
        *self.exchange_calls.lock().unwrap()
    }

    pub fn user_info_count(&self) -> usize {
        *self.user_info_calls.lock().unwrap()
    }
}

#[async_trait]
impl OAuthProvider for StubOAuthProvider {
    async fn exchange_code(&self, code: &str) -> Result<TokenSet, AppError> {
        *self.exchange_calls.lock().unwrap() += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if !self.valid_codes.lock().unwrap().remove(code) {
            return Err(AppError::ExternalServiceError(
                "Google 토큰 교환 실패: invalid_grant (Bad Request)".to_string(),
            ));
        }

        Ok(TokenSet {
            access_token: format!("access-{}", code),
            id_token: self.include_id_token.then(|| stub_id_token(&self.email)),
            refresh_token: Some("refresh".to_string()),
            expires_in: Some(3599),
            token_type: Some("Bearer".to_string()),
            scope: Some("email profile openid".to_string()),
        })
    }

    async fn fetch_user_info(&self, _access_token: &str) -> Result<GoogleUserInfo, AppError> {
        *self.user_info_calls.lock().unwrap() += 1;
        if self.user_info_fails {
            return Err(AppError::ExternalServiceError("userinfo unavailable".to_string()));
        }

        Ok(GoogleUserInfo {
            id: "108234567890".to_string(),
            email: self.email.clone(),
            verified_email: true,
            name: Some("Lucid Trader".to_string()),
            given_name: None,
            family_name: None,
            picture: None,
        })
    }
}

/// 이메일을 키로 사용자를 보관하는 Identity Backend
#[derive(Default)]
pub struct StubIdentityBackend {
    pub users: Mutex<HashMap<String, IdentityUser>>,
    pub fail_with: Mutex<Option<IdentityError>>,
    pub magic_link_fails: bool,
    /// 모든 호출 전에 기다릴 시간
    pub delay: Option<Duration>,
    /// 매직 링크 발급 전에만 기다릴 시간
    pub magic_link_delay: Option<Duration>,
    pub sign_in_calls: Mutex<usize>,
}

impl StubIdentityBackend {
    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn has_user(&self, email: &str) -> bool {
        self.users.lock().unwrap().contains_key(email)
    }

    pub fn seed_user(&self, email: &str) {
        self.users.lock().unwrap().insert(email.to_string(), user(email));
    }

    fn take_failure(&self) -> Option<IdentityError> {
        self.fail_with.lock().unwrap().take()
    }

    async fn wait(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn user(email: &str) -> IdentityUser {
    IdentityUser {
        id: Uuid::new_v4(),
        email: Some(email.to_string()),
        user_metadata: UserMetadata {
            provider: Some("google".to_string()),
            ..UserMetadata::default()
        },
        created_at: None,
    }
}

#[async_trait]
impl IdentityBackend for StubIdentityBackend {
    async fn sign_in_with_id_token(
        &self,
        _provider: AuthProvider,
        id_token: &str,
        _access_token: Option<&str>,
    ) -> Result<IdentitySession, IdentityError> {
        *self.sign_in_calls.lock().unwrap() += 1;
        self.wait().await;
        if let Some(e) = self.take_failure() {
            return Err(e);
        }

        let email = IdTokenClaims::peek(id_token)
            .ok()
            .and_then(|c| c.email)
            .ok_or_else(|| IdentityError::Rejected {
                status: 400,
                code: Some("bad_jwt".to_string()),
                message: "invalid id token".to_string(),
            })?;

        let user = self
            .users
            .lock()
            .unwrap()
            .entry(email.clone())
            .or_insert_with(|| user(&email))
            .clone();

        let mut session = IdentitySession::from_tokens("session-access", "session-refresh", Some(3600));
        session.user = Some(user);
        Ok(session)
    }

    async fn create_user(&self, identity: &NewIdentity) -> Result<IdentityUser, IdentityError> {
        self.wait().await;
        if let Some(e) = self.take_failure() {
            return Err(e);
        }

        let mut users = self.users.lock().unwrap();
        if users.contains_key(&identity.email) {
            return Err(IdentityError::AlreadyRegistered);
        }

        let created = IdentityUser {
            user_metadata: identity.user_metadata.clone(),
            ..user(&identity.email)
        };
        users.insert(identity.email.clone(), created.clone());
        Ok(created)
    }

    async fn generate_magic_link(&self, email: &str) -> Result<MagicLink, IdentityError> {
        self.wait().await;
        if let Some(delay) = self.magic_link_delay {
            tokio::time::sleep(delay).await;
        }
        if self.magic_link_fails {
            return Err(IdentityError::Transport("connection reset".to_string()));
        }

        Ok(MagicLink {
            hashed_token: format!("hash-{}", email.len()),
            action_link: None,
            verification_type: Some("magiclink".to_string()),
        })
    }
}

/// 호출 횟수를 기록하는 세션 클라이언트
pub struct StubSessionClient {
    pub stored: Mutex<Option<IdentitySession>>,
    pub fail: bool,
    pub calls: Mutex<Vec<&'static str>>,
    pub redirects: Mutex<Vec<String>>,
    pub events: broadcast::Sender<AuthChangeEvent>,
}

impl Default for StubSessionClient {
    fn default() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            stored: Mutex::new(None),
            fail: false,
            calls: Mutex::new(Vec::new()),
            redirects: Mutex::new(Vec::new()),
            events,
        }
    }
}

impl StubSessionClient {
    pub fn with_session(session: IdentitySession) -> Self {
        Self {
            stored: Mutex::new(Some(session)),
            ..Self::default()
        }
    }

    /// 다른 탭이나 토큰 갱신처럼 외부에서 일어난 세션 변경을 흉내냅니다.
    pub fn emit(&self, event: AuthChangeEvent) {
        let _ = self.events.send(event);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) -> Result<(), IdentityError> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            Err(IdentityError::Rejected {
                status: 401,
                code: Some("bad_jwt".to_string()),
                message: "invalid JWT".to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn store(&self, session: IdentitySession) -> IdentitySession {
        *self.stored.lock().unwrap() = Some(session.clone());
        let _ = self.events.send(AuthChangeEvent::SignedIn);
        session
    }
}

pub fn stub_session(email: &str) -> IdentitySession {
    let mut session = IdentitySession::from_tokens("at", "rt", Some(3600));
    session.user = Some(user(email));
    session
}

#[async_trait]
impl SessionClient for StubSessionClient {
    async fn set_session(&self, mut session: IdentitySession) -> Result<IdentitySession, IdentityError> {
        self.record("set_session")?;
        session.user.get_or_insert_with(|| user(STUB_EMAIL));
        Ok(self.store(session))
    }

    async fn exchange_code_for_session(&self, _code: &str) -> Result<IdentitySession, IdentityError> {
        self.record("exchange_code_for_session")?;
        Ok(self.store(stub_session(STUB_EMAIL)))
    }

    async fn verify_magic_link(&self, _token_hash: &str) -> Result<IdentitySession, IdentityError> {
        self.record("verify_magic_link")?;
        Ok(self.store(stub_session(STUB_EMAIL)))
    }

    async fn current_session(&self) -> Result<Option<IdentitySession>, IdentityError> {
        self.record("current_session")?;
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.record("sign_out")?;
        *self.stored.lock().unwrap() = None;
        let _ = self.events.send(AuthChangeEvent::SignedOut);
        Ok(())
    }

    async fn start_pkce_sign_in(&self, redirect_to: &str) -> Result<String, IdentityError> {
        self.record("start_pkce_sign_in")?;
        self.redirects.lock().unwrap().push(redirect_to.to_string());
        Ok(format!(
            "https://identity.example.com/auth/v1/authorize?provider=google&redirect_to={}",
            urlencoding::encode(redirect_to)
        ))
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChangeEvent> {
        self.events.subscribe()
    }
}
