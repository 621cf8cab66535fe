//! 브라우저 측 세션 저장소
//!
//! 현재 세션을 `tokio::sync::watch` 채널로 보관합니다. 구독자는 로그인/로그아웃을
//! 새로고침 없이 통지받습니다. 같은 값을 다시 설정하면 통지하지 않습니다.

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::models::identity::IdentitySession;

#[derive(Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<Option<IdentitySession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// 세션을 교체합니다. 값이 실제로 바뀌었을 때만 `true`를 반환하고 구독자에게 알립니다.
    pub fn set(&self, session: Option<IdentitySession>) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == session {
                false
            } else {
                *current = session;
                true
            }
        })
    }

    pub fn current(&self) -> Option<IdentitySession> {
        self.tx.borrow().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<IdentitySession>> {
        self.tx.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
