//! Identity Backend 도메인 모델

pub mod identity_error;
pub mod identity_user;
pub mod session;

pub use identity_error::*;
pub use identity_user::*;
pub use session::*;
