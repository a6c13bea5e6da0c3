//! Full page document
//!
//! Asset URLs are relative so the same document works when served and when
//! exported as a static file.

use chrono::Datelike;
use jc_common::date::{month_name, parse_session_date};
use jc_common::options::SelectOption;
use jc_common::session::MonthlySummary;
use jc_common::stats::SummaryStats;
use jc_common::Session;

use super::deck::render_deck;
use super::list::render_list;
use super::markup::{flag, Html};
use super::timeline::render_timeline;
use crate::controller::{PageController, Theme, ViewMode, THEME_STORAGE_KEY};
use crate::deck::{FOCUS_HEIGHT_RATIO, FOCUS_WIDTH_RATIO, MAX_FOCUS_SCALE};

pub fn render_page(page: &PageController, title: &str) -> String {
    let catalog = page.catalog();
    let sessions: Vec<&Session> = catalog.sessions.iter().collect();
    let shown = |id: usize| page.is_shown(id);
    let matched = page.filtered().len();
    let view = page.view();
    let theme = page.theme();

    let mut html = Html::new();
    html.raw("<!DOCTYPE html>\n");
    html.open(
        "html",
        &[
            ("lang", Some("en")),
            ("data-theme", Some(theme.as_str())),
            ("data-theme-key", Some(THEME_STORAGE_KEY)),
        ],
    );
    html.el("head", &[], |h| {
        h.void("meta", &[("charset", Some("utf-8"))]);
        h.void("meta", &[("name", Some("viewport")), ("content", Some("width=device-width, initial-scale=1"))]);
        h.text_el("title", &[], title);
        h.void("link", &[("rel", Some("stylesheet")), ("href", Some("static/site.css"))]);
    });
    html.newline();

    let view_attr = view.as_str();
    html.open("body", &[("data-view", Some(view_attr))]);
    html.el("header", &[("class", Some("site-header"))], |h| {
        h.text_el("h1", &[], title);
        counters(h, &catalog.stats);
        h.el("div", &[("class", Some("toolbar"))], |h| {
            h.el("div", &[("class", Some("view-toggle")), ("role", Some("group"))], |h| {
                for mode in ViewMode::ALL {
                    let pressed = if mode == view { "true" } else { "false" };
                    h.text_el(
                        "button",
                        &[("type", Some("button")), ("data-view", Some(mode.as_str())), ("aria-pressed", Some(pressed))],
                        mode.label(),
                    );
                }
            });
            h.text_el(
                "button",
                &[("type", Some("button")), ("id", Some("theme-toggle")), ("aria-label", Some("Toggle theme"))],
                if theme == Theme::Dark { "Light mode" } else { "Dark mode" },
            );
        });
    });
    html.newline();

    filter_form(&mut html, page);
    summaries(&mut html, &catalog.summaries);

    html.open("main", &[]);
    let session_count = matched.to_string();
    html.text_el(
        "p",
        &[("id", Some("result-count")), ("data-count", Some(session_count.as_str()))],
        &format!("{} of {} sessions", matched, catalog.stats.total_sessions),
    );

    for mode in ViewMode::ALL {
        html.el(
            "section",
            &[
                ("id", Some(mode.container_id())),
                ("class", Some("view")),
                ("hidden", flag(mode != view)),
            ],
            |h| match mode {
                ViewMode::List => render_list(h, &sessions, shown, catalog.load_error.as_deref()),
                ViewMode::Timeline => render_timeline(h, &sessions, shown),
                ViewMode::Deck => render_deck(h, &sessions, shown, page.deck()),
            },
        );
        html.newline();
    }
    html.close("main");

    // The script sizes the focused card from these
    let width_ratio = FOCUS_WIDTH_RATIO.to_string();
    let height_ratio = FOCUS_HEIGHT_RATIO.to_string();
    let max_scale = MAX_FOCUS_SCALE.to_string();
    html.el(
        "div",
        &[
            ("class", Some("focus-overlay")),
            ("hidden", flag(page.deck().focused().is_none())),
            ("data-focus-width-ratio", Some(width_ratio.as_str())),
            ("data-focus-height-ratio", Some(height_ratio.as_str())),
            ("data-focus-max-scale", Some(max_scale.as_str())),
        ],
        |_| {},
    );
    html.el("script", &[("src", Some("static/app.js")), ("defer", Some(""))], |_| {});
    html.close("body");
    html.close("html");
    html.newline();
    html.into_string()
}

fn counters(html: &mut Html, stats: &SummaryStats) {
    let total = stats.total_sessions.to_string();
    let journals = stats.journals.to_string();
    let presenters = stats.presenters.to_string();
    let latest = stats.latest_year_label();

    html.el("dl", &[("class", Some("counters"))], |h| {
        for (label, value) in [
            ("Sessions", total.as_str()),
            ("Journals", journals.as_str()),
            ("Presenters", presenters.as_str()),
        ] {
            h.el("div", &[], |h| {
                h.text_el("dt", &[], label);
                h.text_el("dd", &[("data-count", Some(value))], value);
            });
        }
        h.el("div", &[], |h| {
            h.text_el("dt", &[], "Latest year");
            // Placeholder dash is not animated
            let count = stats.latest_year.map(|_| latest.as_str());
            h.text_el("dd", &[("data-count", count), ("id", Some("latest-year"))], &latest);
        });
    });
}

fn filter_form(html: &mut Html, page: &PageController) {
    let options = &page.catalog().options;
    let filter = page.filter();

    html.el("form", &[("class", Some("filters")), ("method", Some("get")), ("role", Some("search"))], |h| {
        select(h, "year", "Year", &options.year_options(&filter.year));
        select(h, "month", "Month", &options.month_options(&filter.month));
        select(h, "journal", "Journal", &options.journal_options(&filter.journal));
        if options.has_presenters() {
            select(h, "presenter", "Presenter", &options.presenter_options(&filter.presenter));
        }
        if options.has_subjects() {
            select(h, "subject", "Subject", &options.subject_options(&filter.subject));
        }
        h.el("label", &[], |h| {
            h.text("Search ");
            h.void(
                "input",
                &[
                    ("type", Some("search")),
                    ("name", Some("q")),
                    ("id", Some("filter-q")),
                    ("value", Some(filter.search.as_str())),
                    ("placeholder", Some("Title, journal, authors, notes")),
                ],
            );
        });
        h.void("input", &[("type", Some("hidden")), ("name", Some("view")), ("value", Some(page.view().as_str()))]);
        h.text_el("button", &[("type", Some("submit"))], "Apply");
    });
    html.newline();
}

fn select(html: &mut Html, name: &str, label: &str, options: &[SelectOption]) {
    let id = format!("filter-{name}");
    html.el("label", &[("for", Some(id.as_str()))], |h| {
        h.text(label);
    });
    html.el("select", &[("name", Some(name)), ("id", Some(id.as_str()))], |h| {
        for option in options {
            h.text_el(
                "option",
                &[("value", Some(option.value.as_str())), ("selected", flag(option.selected))],
                &option.label,
            );
        }
    });
}

fn summaries(html: &mut Html, summaries: &[MonthlySummary]) {
    if summaries.is_empty() {
        return;
    }

    html.el("aside", &[("class", Some("monthly-summaries"))], |h| {
        h.text_el("h2", &[], "Monthly highlights");
        for summary in summaries {
            h.el("article", &[("class", Some("monthly-summary")), ("data-month", Some(summary.month.as_str()))], |h| {
                h.text_el("h3", &[], &month_label(&summary.month));
                if !summary.headline.is_empty() {
                    h.text_el("p", &[("class", Some("headline"))], &summary.headline);
                }
                if !summary.paragraph.is_empty() {
                    h.text_el("p", &[], &summary.paragraph);
                }
                if !summary.key_highlights.is_empty() {
                    h.el("ul", &[], |h| {
                        for highlight in &summary.key_highlights {
                            h.text_el("li", &[], highlight);
                        }
                    });
                }
            });
        }
    });
    html.newline();
}

/// `2025-03` → `March 2025`; unparsable keys are shown as written
fn month_label(month: &str) -> String {
    match parse_session_date(month) {
        Some(date) => format!("{} {}", month_name(date.month0()), date.year()),
        None => month.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use jc_common::{FilterState, Selection};
    use serde_json::json;
    use std::sync::Arc;

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::from_document(&json!({
            "sessions": [
                {"date": "2025-03-05", "title": "<script>alert(1)</script>", "journal": "JAMA", "presenter": "Dr. Lee"},
                {"date": "2024-01-01", "title": "Older", "journal": "Laryngoscope"}
            ],
            "monthly_summaries": [
                {"month": "2025-03", "headline": "Busy month", "paragraph": "", "key_highlights": ["One"]}
            ]
        })))
    }

    #[test]
    fn test_all_views_rendered_inactive_hidden() {
        let page = PageController::new(catalog(), ViewMode::Timeline, Theme::Dark);
        let out = render_page(&page, "Journal Club");

        assert!(out.contains("<section id=\"list-view\" class=\"view\" hidden>"));
        assert!(out.contains("<section id=\"timeline-view\" class=\"view\">"));
        assert!(out.contains("<section id=\"deck-view\" class=\"view\" hidden>"));
        assert!(out.contains("data-theme=\"dark\""));
        assert!(out.contains("March 2025"));
        assert!(out.contains("Busy month"));
    }

    #[test]
    fn test_titles_escaped() {
        let page = PageController::new(catalog(), ViewMode::List, Theme::Light);
        let out = render_page(&page, "Journal Club");
        assert!(!out.contains("<script>alert(1)</script>"));
        assert!(out.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_no_match_gives_one_placeholder_per_view() {
        let page = PageController::new(catalog(), ViewMode::List, Theme::Light).with_filter(FilterState {
            search: "no such session".into(),
            ..FilterState::default()
        });
        let out = render_page(&page, "Journal Club");
        assert_eq!(out.matches("class=\"empty-state\"").count(), 3);
    }

    #[test]
    fn test_counters_and_selected_option() {
        let page = PageController::new(catalog(), ViewMode::List, Theme::Light).with_filter(FilterState {
            journal: Selection::Only("JAMA".into()),
            ..FilterState::default()
        });
        let out = render_page(&page, "Journal Club");

        assert!(out.contains("<dd data-count=\"2\">2</dd>"));
        assert!(out.contains("<option value=\"JAMA\" selected>JAMA</option>"));
        assert!(out.contains("name=\"presenter\""));
        assert!(!out.contains("name=\"subject\""));
        assert!(out.contains("1 of 2 sessions"));
    }

    #[test]
    fn test_filtered_out_sessions_present_but_hidden() {
        let page = PageController::new(catalog(), ViewMode::List, Theme::Light).with_filter(FilterState {
            journal: Selection::Only("JAMA".into()),
            ..FilterState::default()
        });
        let out = render_page(&page, "Journal Club");

        // One hidden copy per view, so the browser can widen the filter again
        assert_eq!(out.matches("data-journal=\"Laryngoscope\"").count(), 3);
        assert!(out.contains("<article class=\"session-card\" hidden data-id=\"1\""));
        assert!(out.contains("<article class=\"session-card\" data-id=\"0\""));
        assert!(out.contains("<section class=\"timeline-year\" data-year=\"2024\" hidden>"));
        assert_eq!(out.matches("<p class=\"empty-state\" hidden>").count(), 3);
    }

    #[test]
    fn test_script_inputs_rendered() {
        let page = PageController::new(catalog(), ViewMode::Deck, Theme::Light);
        let out = render_page(&page, "Journal Club");

        assert!(out.contains("data-theme-key=\"journal-club-theme\""));
        assert!(out.contains("data-focus-width-ratio=\"0.9\""));
        assert!(out.contains("data-focus-height-ratio=\"0.85\""));
        assert!(out.contains("data-focus-max-scale=\"2.5\""));
        assert!(out.contains("id=\"result-count\" data-count=\"2\""));
        assert!(out.contains("data-subjects=\"\""));
        assert!(out.contains("data-search=\"&lt;script&gt;alert(1)&lt;/script&gt; jama dr. lee\""));
    }

    #[test]
    fn test_empty_catalog_shows_dash() {
        let page = PageController::new(Arc::new(Catalog::failed("IO error: gone")), ViewMode::List, Theme::Light);
        let out = render_page(&page, "Journal Club");
        assert!(out.contains("<dd id=\"latest-year\">—</dd>"));
        assert!(out.contains("IO error: gone"));
    }
}
