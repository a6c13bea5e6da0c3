//! jc-site library - journal club archive site
//!
//! Serves the session catalog as a filterable page (list, timeline and
//! flip-card deck views) plus a small JSON API, and renders the same page as
//! a static export.

use axum::Router;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod api;
pub mod catalog;
pub mod controller;
pub mod deck;
pub mod error;
pub mod export;
pub mod render;

use catalog::Catalog;
use controller::ViewMode;

/// Presentation settings from the config file
#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub title: String,
    pub default_view: ViewMode,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: "Journal Club".to_string(),
            default_view: ViewMode::default(),
        }
    }
}

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Current catalog; replaced wholesale on reload
    catalog: Arc<RwLock<Arc<Catalog>>>,
    /// Data file the catalog was read from
    pub data_path: PathBuf,
    pub site: Arc<SiteSettings>,
}

impl AppState {
    /// Create new application state
    pub fn new(catalog: Catalog, data_path: PathBuf, site: SiteSettings) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(Arc::new(catalog))),
            data_path,
            site: Arc::new(site),
        }
    }

    /// Load the data file and build state around it
    pub async fn load(data_path: &Path, site: SiteSettings) -> Self {
        let catalog = Catalog::load(data_path).await;
        Self::new(catalog, data_path.to_path_buf(), site)
    }

    /// Snapshot of the current catalog
    pub async fn catalog(&self) -> Arc<Catalog> {
        self.catalog.read().await.clone()
    }

    /// Re-read the data file and swap in the new catalog.
    ///
    /// On failure the previous catalog stays in place.
    pub async fn reload(&self) -> jc_common::Result<Arc<Catalog>> {
        let fresh = Arc::new(Catalog::try_load(&self.data_path).await?);
        *self.catalog.write().await = fresh.clone();
        info!("Catalog reloaded from {}", self.data_path.display());
        Ok(fresh)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route("/api/sessions", get(api::list_sessions))
        .route("/api/sessions/:id", get(api::get_session))
        .route("/api/options", get(api::get_options))
        .route("/api/summary", get(api::get_summary))
        .route("/api/reload", post(api::reload))
        .route("/api/buildinfo", get(api::get_build_info));

    let pages = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/static/site.css", get(api::serve_site_css))
        .merge(api::health_routes());

    Router::new()
        .merge(api)
        .merge(pages)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
