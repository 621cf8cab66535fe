//! 브라우저 측 인증 상태 모듈
//!
//! 콜백 리다이렉트 이후 페이지에서 동작하는 구성 요소들입니다.
//!
//! - [`AuthStateTracker`]: URL의 인증 신호를 처리하여 로컬 세션 확정
//! - [`SessionStore`]: 현재 세션과 변경 통지
//! - [`ContentGate`]: 로그인 여부에 따른 콘텐츠 가림
//!
//! ```rust,ignore
//! let store = SessionStore::new();
//! let tracker = AuthStateTracker::new(session_client, store.clone(), Arc::new(LogNotifier));
//! let gate = ContentGate::new(&store);
//!
//! tracker.reconcile(&mut location).await;
//! let html = gate.render(&analysis_html);
//! ```

pub mod auth_state_tracker;
pub mod content_gate;
pub mod location;
pub mod notifications;
pub mod session_store;

pub use auth_state_tracker::*;
pub use content_gate::*;
pub use location::*;
pub use notifications::*;
pub use session_store::*;
