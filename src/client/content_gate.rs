//! 회원 전용 콘텐츠 게이트
//!
//! 로그인하지 않은 사용자에게는 콘텐츠를 흐리게 가리고 가입 유도 오버레이를 덮습니다.
//! [`SessionStore`] 변경을 구독하므로 로그인/로그아웃 즉시 상태가 바뀝니다.

use tokio::sync::watch;

use super::session_store::SessionStore;
use crate::domain::models::identity::IdentitySession;

pub const GATE_HEADLINE: &str = "Create Your Free Account to Unlock";
pub const GATE_BUTTON: &str = "Get Access Now";
pub const DEFAULT_LOGIN_PATH: &str = "/auth/google";

const OBSCURED_STYLE: &str = "filter: blur(8px) contrast(0.7) brightness(0.8); \
                              pointer-events: none; user-select: none;";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Authenticated,
    Unauthenticated,
}

pub struct ContentGate {
    rx: watch::Receiver<Option<IdentitySession>>,
    login_path: String,
}

impl ContentGate {
    pub fn new(store: &SessionStore) -> Self {
        Self::with_login_path(store, DEFAULT_LOGIN_PATH)
    }

    pub fn with_login_path(store: &SessionStore, login_path: impl Into<String>) -> Self {
        Self {
            rx: store.subscribe(),
            login_path: login_path.into(),
        }
    }

    pub fn state(&self) -> GateState {
        if self.rx.borrow().is_some() {
            GateState::Authenticated
        } else {
            GateState::Unauthenticated
        }
    }

    /// 현재 세션 상태로 콘텐츠를 렌더링합니다.
    pub fn render(&self, children: &str) -> String {
        match self.state() {
            GateState::Authenticated => children.to_string(),
            GateState::Unauthenticated => format!(
                concat!(
                    r#"<div class="content-gate" data-gate-state="locked">"#,
                    r#"<div class="content-gate__content" aria-hidden="true" inert style="{style}">{children}</div>"#,
                    r#"<div class="content-gate__overlay" role="dialog" aria-modal="true">"#,
                    r#"<h2>{headline}</h2>"#,
                    r#"<a class="content-gate__cta" href="{login}">{button}</a>"#,
                    r#"</div></div>"#
                ),
                style = OBSCURED_STYLE,
                children = children,
                headline = GATE_HEADLINE,
                login = self.login_path,
                button = GATE_BUTTON,
            ),
        }
    }

    /// 다음 로그인/로그아웃까지 기다립니다. 저장소가 사라지면 `None`입니다.
    pub async fn changed(&mut self) -> Option<GateState> {
        self.rx.changed().await.ok()?;
        Some(self.state())
    }
}
