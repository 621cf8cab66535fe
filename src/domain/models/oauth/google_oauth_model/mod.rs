//! # Google OAuth 2.0 Domain Models

pub mod google_user;
pub mod oauth_provider;

pub use google_user::*;
pub use oauth_provider::*;
