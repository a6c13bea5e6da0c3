//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response: status, module name, version and catalog size
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub sessions: usize,
    /// False when the data file could not be loaded
    pub data_loaded: bool,
}

/// GET /health
///
/// Reports "ok" even when the data file failed to load; `data_loaded`
/// tells the two apart.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let catalog = state.catalog().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "jc-site".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sessions: catalog.sessions.len(),
        data_loaded: catalog.load_error.is_none(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
