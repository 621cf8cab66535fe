//! 인증 플로우 도메인 모델
//!
//! - [`callback_failure`] - 콜백 실패 분류와 에러 코드
//! - [`auth_signal`] - 브라우저 URL의 인증 신호 해석

pub mod auth_signal;
pub mod callback_failure;

pub use auth_signal::*;
pub use callback_failure::*;
