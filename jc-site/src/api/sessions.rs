//! Session listing endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use jc_common::filter::{filter_sessions, FilterQuery};
use jc_common::{FilterState, Session};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Filtered session listing
#[derive(Debug, Serialize)]
pub struct SessionsResponse {
    /// Sessions in the catalog
    pub total: usize,
    /// Sessions passing the filter
    pub matched: usize,
    /// Filter actually applied, after reconciliation against the options
    pub filter: FilterState,
    pub sessions: Vec<Session>,
}

/// GET /api/sessions
///
/// Accepts the same filter parameters as the page.
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Json<SessionsResponse> {
    let catalog = state.catalog().await;
    let filter = catalog.options.reconcile(FilterState::from(&query));
    let sessions: Vec<Session> = filter_sessions(&catalog.sessions, &filter)
        .into_iter()
        .cloned()
        .collect();

    Json(SessionsResponse {
        total: catalog.sessions.len(),
        matched: sessions.len(),
        filter,
        sessions,
    })
}

/// GET /api/sessions/:id
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Session>> {
    let id: usize = id
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("session id must be a number: {id}")))?;

    let catalog = state.catalog().await;
    catalog
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("session {id}")))
}
