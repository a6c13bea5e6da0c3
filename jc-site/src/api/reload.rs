//! Catalog reload

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use jc_common::FilterState;
use serde::Serialize;
use tracing::{debug, warn};

use crate::controller::{PageController, PageQuery};
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub sessions: usize,
    pub dropped: usize,
    pub loaded_at: DateTime<Utc>,
    /// Caller's page state carried over to the new catalog; selections that
    /// no longer exist are reset to all
    pub filter: FilterState,
    /// Sessions the carried-over filter matches
    pub matched: usize,
    /// Focused deck card, if it is still shown
    pub focus: Option<usize>,
}

/// POST /api/reload
///
/// Re-reads the data file. A failed read leaves the current catalog serving.
/// Accepts the page query so a client learns where its state lands.
pub async fn reload(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ReloadResponse>> {
    let mut page = PageController::from_query(state.catalog().await, &query, state.site.default_view);

    let catalog = state.reload().await.map_err(|e| {
        warn!("Reload of {} failed: {}", state.data_path.display(), e);
        e
    })?;
    let effect = page.replace_catalog(catalog.clone());
    debug!("Reload: {:?}, {} sessions match", effect, page.filtered().len());

    Ok(Json(ReloadResponse {
        sessions: catalog.sessions.len(),
        dropped: catalog.dropped.len(),
        loaded_at: catalog.loaded_at,
        filter: page.filter().clone(),
        matched: page.filtered().len(),
        focus: page.deck().focused(),
    }))
}
