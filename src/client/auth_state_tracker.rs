//! # 브라우저 측 인증 상태 추적기
//!
//! 콜백 리다이렉트로 돌아온 페이지에서 URL에 실린 인증 신호를 처리하여
//! 로컬 세션을 확정하고, 결과를 알림으로 보여준 뒤 주소 표시줄을 정리합니다.
//!
//! ## 처리 순서
//!
//! 1. URL을 [`AuthSignal`]로 분류
//! 2. 쿼리나 프래그먼트가 있으면 경로만 남기도록 주소 교체 (새로고침 없음)
//! 3. 신호별 처리
//!
//! | 신호 | 처리 | 알림 |
//! |------|------|------|
//! | `Error` | 세션 시도 없음 | 에러 |
//! | `ImplicitTokens` | `set_session` | 성공 시 "Welcome!" |
//! | `MagicLink` | `verify_magic_link` | 성공 시 "Welcome!" |
//! | `Code` | `exchange_code_for_session` | 성공 시 "Welcome!" |
//! | `None` | `current_session` 1회 조회 | `auth=success`인데 세션이 없거나 조회 실패 시 에러 |
//!
//! 이미 정리된 URL에서 다시 실행하면 알림도 상태 변화도 없습니다.
//!
//! [`AuthStateTracker::follow`]는 첫 처리 후 세션 클라이언트의 [`AuthChangeEvent`]를
//! 따라가며 로컬 상태를 맞춥니다.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;

use super::location::{path_only, BrowserLocation};
use super::notifications::{
    Notification, Notifier, MAGIC_LINK_FAILED_MESSAGE, SESSION_FAILED_MESSAGE,
    SESSION_MISSING_MESSAGE, SIGN_IN_FAILED_MESSAGE, SIGN_OUT_FAILED_MESSAGE, WELCOME_MESSAGE,
    WELCOME_TITLE,
};
use super::session_store::SessionStore;
use crate::domain::models::auth::{parse_auth_signal, AuthSignal};
use crate::domain::models::identity::{IdentityError, IdentitySession};
use crate::services::auth::{AuthChangeEvent, SessionClient};
use crate::utils::url_utils::has_query_or_fragment;

pub struct AuthStateTracker {
    session_client: Arc<dyn SessionClient>,
    store: SessionStore,
    notifier: Arc<dyn Notifier>,
}

impl AuthStateTracker {
    pub fn new(
        session_client: Arc<dyn SessionClient>,
        store: SessionStore,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            session_client,
            store,
            notifier,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// 현재 URL의 인증 신호를 처리합니다. 처리한 신호를 반환합니다.
    ///
    /// 세션 확정 실패는 알림으로만 보고되며 호출자에게 에러로 전파되지 않습니다.
    pub async fn reconcile(&self, location: &mut dyn BrowserLocation) -> AuthSignal {
        let href = location.href().to_string();
        let signal = parse_auth_signal(&href);

        // 토큰이 주소 표시줄과 히스토리에 남지 않도록 먼저 정리
        if has_query_or_fragment(&href) {
            location.replace_state(&path_only(&href));
        }

        match &signal {
            AuthSignal::Error { code, message } => {
                log::warn!("인증 에러 신호 수신: {}", code);
                self.notifier.notify(Notification::error(message.clone()));
            }
            AuthSignal::ImplicitTokens {
                access_token,
                refresh_token,
                expires_in,
            } => {
                let session = IdentitySession::from_tokens(
                    access_token.clone(),
                    refresh_token.clone().unwrap_or_default(),
                    *expires_in,
                );
                let result = self.session_client.set_session(session).await;
                self.establish(result, SESSION_FAILED_MESSAGE);
            }
            AuthSignal::MagicLink { token_hash } => {
                let result = self.session_client.verify_magic_link(token_hash).await;
                self.establish(result, MAGIC_LINK_FAILED_MESSAGE);
            }
            AuthSignal::Code { code } => {
                let result = self.session_client.exchange_code_for_session(code).await;
                self.establish(result, SESSION_FAILED_MESSAGE);
            }
            AuthSignal::None { success_marker } => {
                self.restore(*success_marker).await;
            }
        }

        signal
    }

    /// 페이지를 처리한 뒤 세션 변경 이벤트를 따라갑니다. 이벤트 스트림이 닫히면 끝납니다.
    pub async fn follow(&self, location: &mut dyn BrowserLocation) {
        let mut events = self.session_client.subscribe();
        self.reconcile(location).await;

        loop {
            match events.recv().await {
                Ok(event) => self.handle_event(event).await,
                Err(RecvError::Lagged(skipped)) => {
                    log::debug!("세션 이벤트 {}건 누락, 다시 조회", skipped);
                    self.restore(false).await;
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    /// 세션 변경 이벤트 하나를 로컬 상태에 반영합니다. 알림은 띄우지 않습니다.
    pub async fn handle_event(&self, event: AuthChangeEvent) {
        match event {
            AuthChangeEvent::SignedIn => self.restore(false).await,
            AuthChangeEvent::SignedOut => {
                if self.store.set(None) {
                    log::info!("세션 종료 반영");
                }
            }
        }
    }

    /// Google 로그인을 시작합니다. 브라우저가 이동할 인가 URL을 반환합니다.
    pub async fn sign_in_with_google(&self, redirect_to: &str) -> Option<String> {
        match self.session_client.start_pkce_sign_in(redirect_to).await {
            Ok(url) => Some(url),
            Err(e) => {
                log::warn!("로그인 시작 실패: {}", e);
                self.notifier.notify(Notification::error(SIGN_IN_FAILED_MESSAGE));
                None
            }
        }
    }

    /// 세션을 폐기하고 로컬 상태를 비웁니다.
    pub async fn sign_out(&self) -> bool {
        match self.session_client.sign_out().await {
            Ok(()) => {
                self.store.set(None);
                log::info!("로그아웃 완료");
                true
            }
            Err(e) => {
                log::warn!("로그아웃 실패: {}", e);
                self.notifier.notify(Notification::error(SIGN_OUT_FAILED_MESSAGE));
                false
            }
        }
    }

    fn establish(&self, result: Result<IdentitySession, IdentityError>, failure_message: &str) {
        match result {
            Ok(session) => {
                log::info!("세션 확정: {}", session.email().unwrap_or("<unknown>"));
                self.store.set(Some(session));
                self.notifier
                    .notify(Notification::success(WELCOME_TITLE, WELCOME_MESSAGE));
            }
            Err(e) => {
                log::warn!("세션 확정 실패: {}", e);
                self.notifier.notify(Notification::error(failure_message));
            }
        }
    }

    /// 보관된 세션을 한 번 조회합니다. 변경이 없으면 아무 일도 일어나지 않습니다.
    async fn restore(&self, success_marker: bool) {
        match self.session_client.current_session().await {
            Ok(Some(session)) => {
                if self.store.set(Some(session)) {
                    log::debug!("기존 세션 복원");
                }
            }
            // 백엔드는 성공을 알렸는데 넘겨받은 세션이 없는 경우
            Ok(None) if success_marker => {
                log::warn!("auth=success 이지만 보관된 세션 없음");
                self.notifier.notify(Notification::error(SESSION_MISSING_MESSAGE));
            }
            Ok(None) => {}
            // 로그인 직후가 아니면 조용히 넘어갑니다
            Err(e) if success_marker => {
                log::warn!("세션 조회 실패: {}", e);
                self.notifier.notify(Notification::error(SESSION_FAILED_MESSAGE));
            }
            Err(e) => log::debug!("세션 조회 실패: {}", e),
        }
    }
}
