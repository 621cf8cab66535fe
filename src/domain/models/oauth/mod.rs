//! # OAuth Domain Models Module

pub mod google_oauth_model;

pub use google_oauth_model::*;
