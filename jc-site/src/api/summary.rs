//! Header counters and monthly summaries

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use jc_common::session::MonthlySummary;
use jc_common::SummaryStats;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub stats: SummaryStats,
    /// Latest year as displayed (dash when there are no sessions)
    pub latest_year_label: String,
    pub monthly_summaries: Vec<MonthlySummary>,
    /// Records excluded during normalization
    pub dropped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
    pub loaded_at: DateTime<Utc>,
}

/// GET /api/summary
///
/// Counters always describe the full catalog, never a filtered view.
pub async fn get_summary(State(state): State<AppState>) -> Json<SummaryResponse> {
    let catalog = state.catalog().await;
    Json(SummaryResponse {
        stats: catalog.stats,
        latest_year_label: catalog.stats.latest_year_label(),
        monthly_summaries: catalog.summaries.clone(),
        dropped: catalog.dropped.len(),
        load_error: catalog.load_error.clone(),
        loaded_at: catalog.loaded_at,
    })
}
