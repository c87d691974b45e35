//! HTTP API handlers for dv-site

pub mod banner;
pub mod buildinfo;
pub mod consent;
pub mod health;
pub mod theme;
pub mod ui;
pub mod works;

pub use banner::get_banner_settings;
pub use buildinfo::get_build_info;
pub use consent::{accept_consent, get_consent};
pub use health::health_routes;
pub use theme::{get_theme, put_theme};
pub use ui::{serve_app_js, serve_index, serve_style_css};
pub use works::{get_works, resolve_url};
