//! HTTP API handlers for jc-site

pub mod buildinfo;
pub mod health;
pub mod options;
pub mod reload;
pub mod sessions;
pub mod summary;
pub mod ui;

pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use options::get_options;
pub use reload::reload;
pub use sessions::{get_session, list_sessions};
pub use summary::get_summary;
pub use ui::{serve_app_js, serve_index, serve_site_css};
