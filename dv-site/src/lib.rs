//! dv-site library - DoubleVisuals portfolio site host
//!
//! Serves the static page shell and a small JSON API over the
//! `dv-common` core: resolved portfolio embeds, consent, theme and banner
//! timing. Pages are rendered client-side; the server holds no visitor
//! state beyond what each request carries in cookies and headers.

use std::sync::Arc;

use axum::Router;
use dv_common::config::SiteConfig;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod client_state;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Resolved site configuration
    pub config: Arc<SiteConfig>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: SiteConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/api/works", get(api::get_works))
        .route("/api/resolve", get(api::resolve_url))
        .route("/api/consent", get(api::get_consent))
        .route("/api/consent/accept", post(api::accept_consent))
        .route("/api/theme", get(api::get_theme).put(api::put_theme))
        .route("/api/banner", get(api::get_banner_settings));

    let shell = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/static/style.css", get(api::serve_style_css))
        .merge(api::health_routes());

    Router::new()
        .merge(api)
        .merge(shell)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
