//! Page and static asset routes

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::controller::{PageController, PageQuery};
use crate::render::render_page;
use crate::AppState;

pub const APP_JS: &str = include_str!("../ui/app.js");
pub const SITE_CSS: &str = include_str!("../ui/site.css");

/// GET /
///
/// Renders the full page for the requested filter, view, theme and focus
pub async fn serve_index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    let catalog = state.catalog().await;
    let page = PageController::from_query(catalog, &query, state.site.default_view);
    Html(render_page(&page, &state.site.title))
}

/// GET /static/app.js
pub async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript")],
        APP_JS,
    )
        .into_response()
}

/// GET /static/site.css
pub async fn serve_site_css() -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, "text/css")], SITE_CSS).into_response()
}
