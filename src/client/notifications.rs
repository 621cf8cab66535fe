//! 사용자 알림
//!
//! 인증 결과를 일시적인 토스트 알림으로 보여줍니다.
//! 화면 렌더링과 분리하기 위해 [`Notifier`] 트레이트로 추상화합니다.

pub const AUTH_ERROR_TITLE: &str = "Authentication Error";
pub const WELCOME_TITLE: &str = "Welcome!";
pub const WELCOME_MESSAGE: &str = "Successfully signed in with Google";
pub const MAGIC_LINK_FAILED_MESSAGE: &str = "Failed to verify authentication token";
pub const SESSION_FAILED_MESSAGE: &str = "Failed to retrieve user session";
pub const SESSION_MISSING_MESSAGE: &str = "Sign-in finished but no session was found. Please sign in again.";
pub const SIGN_IN_FAILED_MESSAGE: &str = "Failed to start Google sign-in";
pub const SIGN_OUT_FAILED_MESSAGE: &str = "Failed to sign out";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: AUTH_ERROR_TITLE.to_string(),
            description: description.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// 알림을 로그로만 남기는 기본 구현
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => {
                log::info!("{}: {}", notification.title, notification.description)
            }
            NotificationKind::Error => {
                log::warn!("{}: {}", notification.title, notification.description)
            }
        }
    }
}

/// 받은 알림을 순서대로 보관하는 테스트용 구현
#[cfg(test)]
#[derive(Default)]
pub struct RecordingNotifier {
    pub received: std::sync::Mutex<Vec<Notification>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.received.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received.lock().unwrap().push(notification);
    }
}
