//! # Core Module
//!
//! 애플리케이션 전역에서 공유되는 상태를 제공합니다.
//!
//! 서비스들은 전역 싱글톤이 아니라 [`AppState`]가 소유하며,
//! `web::Data<AppState>`를 통해 핸들러에 전달됩니다.
//!
//! ```rust,ignore
//! let state = web::Data::new(AppState::from_env()?);
//!
//! HttpServer::new(move || App::new().app_data(state.clone()).configure(configure_all_routes))
//! ```

pub mod app_state;

pub use app_state::*;
