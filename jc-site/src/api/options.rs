//! Filter option lists

use axum::{
    extract::{Query, State},
    Json,
};
use jc_common::filter::FilterQuery;
use jc_common::options::SelectOption;
use jc_common::FilterState;
use serde::Serialize;

use crate::AppState;

/// Selector contents, each led by its "all" entry.
///
/// Presenter and subject lists are omitted when the catalog has none.
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub year: Vec<SelectOption>,
    pub month: Vec<SelectOption>,
    pub journal: Vec<SelectOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presenter: Option<Vec<SelectOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Vec<SelectOption>>,
    /// Requested selection after stale values were reset
    pub filter: FilterState,
}

/// GET /api/options
pub async fn get_options(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Json<OptionsResponse> {
    let catalog = state.catalog().await;
    let options = &catalog.options;
    let filter = options.reconcile(FilterState::from(&query));

    Json(OptionsResponse {
        year: options.year_options(&filter.year),
        month: options.month_options(&filter.month),
        journal: options.journal_options(&filter.journal),
        presenter: options
            .has_presenters()
            .then(|| options.presenter_options(&filter.presenter)),
        subject: options
            .has_subjects()
            .then(|| options.subject_options(&filter.subject)),
        filter,
    })
}
