//! # Domain Models
//!
//! 외부 시스템과 주고받거나 플로우 내부에서 사용하는 값 객체들입니다.
//! 어떤 모델도 영속화되지 않습니다.

pub mod auth;
pub mod identity;
pub mod market;
pub mod oauth;

pub use auth::*;
pub use identity::*;
pub use market::*;
pub use oauth::*;
