//! Server-side HTML rendering
//!
//! Every view container is rendered on every request, and every catalog
//! session is rendered into each of them. Sessions outside the current filter
//! carry `hidden`; cards carry `data-*` attributes so the browser script can
//! re-filter over the whole catalog without a round trip.

pub mod deck;
pub mod list;
pub mod markup;
pub mod page;
pub mod timeline;

use jc_common::escape::safe_url;
use jc_common::filter::search_haystack;
use jc_common::Session;

use markup::{flag, Html};

pub use page::render_page;

/// Placeholder shown when the filter matches nothing
pub const EMPTY_MESSAGE: &str = "No sessions match the current filters.";

/// Deck back face text for sessions without an abstract
pub const NO_ABSTRACT: &str = "No abstract available.";

/// Separator between subjects in `data-subjects`
pub const SUBJECT_SEPARATOR: &str = "|";

/// Values the browser filter reads from each card
pub(crate) struct FilterData {
    id: String,
    year: String,
    month: String,
    subjects: String,
    search: String,
}

impl FilterData {
    pub(crate) fn new(session: &Session) -> Self {
        Self {
            id: session.id.to_string(),
            year: session.year.to_string(),
            month: session.month_index.to_string(),
            subjects: session.subjects.join(SUBJECT_SEPARATOR),
            search: search_haystack(session),
        }
    }

    /// Attribute list for a card element, led by `class`
    pub(crate) fn attrs<'a>(
        &'a self,
        class: &'a str,
        session: &'a Session,
        shown: bool,
    ) -> Vec<(&'static str, Option<&'a str>)> {
        vec![
            ("class", Some(class)),
            ("hidden", flag(!shown)),
            ("data-id", Some(self.id.as_str())),
            ("data-year", Some(self.year.as_str())),
            ("data-month", Some(self.month.as_str())),
            ("data-journal", session.journal.as_deref()),
            ("data-presenter", session.presenter.as_deref()),
            ("data-subjects", Some(self.subjects.as_str())),
            ("data-search", Some(self.search.as_str())),
        ]
    }
}

/// The single "no results" element of a view, hidden while something matches
pub(crate) fn empty_state(html: &mut Html, any_shown: bool) {
    html.text_el(
        "p",
        &[("class", Some("empty-state")), ("hidden", flag(any_shown))],
        EMPTY_MESSAGE,
    );
}

/// External links: PubMed, PDF, DOI, each only when present with a web URL
pub(crate) fn links(html: &mut Html, session: &Session) {
    let pubmed = session.pubmed_url();
    let doi = session.doi_url();
    let entries = [
        (pubmed.as_deref().and_then(safe_url), "PubMed"),
        (session.pdf.as_deref().and_then(safe_url), "PDF"),
        (doi.as_deref().and_then(safe_url), "DOI"),
    ];

    if entries.iter().all(|(href, _)| href.is_none()) {
        return;
    }

    html.el("nav", &[("class", Some("session-links"))], |h| {
        for (href, label) in entries {
            if let Some(href) = href {
                h.text_el(
                    "a",
                    &[("href", Some(href)), ("target", Some("_blank")), ("rel", Some("noopener"))],
                    label,
                );
            }
        }
    });
}

pub(crate) fn subject_tags(html: &mut Html, session: &Session) {
    if session.subjects.is_empty() {
        return;
    }
    html.el("ul", &[("class", Some("subject-tags"))], |h| {
        for subject in &session.subjects {
            h.text_el("li", &[], subject);
        }
    });
}

/// Optional text field as an element; nothing when absent
pub(crate) fn optional(html: &mut Html, tag: &str, class: &str, value: Option<&str>) {
    if let Some(value) = value {
        html.text_el(tag, &[("class", Some(class))], value);
    }
}
