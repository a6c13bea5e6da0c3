//! List view: one card per session

use jc_common::date::short_form;
use jc_common::escape::safe_url;
use jc_common::Session;

use super::markup::Html;
use super::{empty_state, links, optional, subject_tags, FilterData};
use crate::catalog::LOAD_ERROR_MESSAGE;

/// Render the list container's children.
///
/// Sessions for which `shown` is false are rendered hidden. A load failure
/// replaces the cards with an error placeholder.
pub fn render_list(
    html: &mut Html,
    sessions: &[&Session],
    shown: impl Fn(usize) -> bool,
    load_error: Option<&str>,
) {
    if let Some(error) = load_error {
        html.el("div", &[("class", Some("empty-state error-state")), ("role", Some("alert"))], |h| {
            h.text_el("p", &[], LOAD_ERROR_MESSAGE);
            h.text_el("p", &[("class", Some("error-detail"))], error);
        });
        return;
    }

    let mut any_shown = false;
    for session in sessions {
        let visible = shown(session.id);
        any_shown |= visible;
        card(html, session, visible);
        html.newline();
    }
    empty_state(html, any_shown);
}

fn card(html: &mut Html, session: &Session, shown: bool) {
    let data = FilterData::new(session);
    let class = if session.highlight {
        "session-card highlight"
    } else {
        "session-card"
    };
    let iso = session.date.to_string();

    html.el("article", &data.attrs(class, session, shown), |h| {
        h.el("header", &[("class", Some("session-meta"))], |h| {
            h.text_el("time", &[("datetime", Some(iso.as_str()))], &short_form(session.date));
            if session.highlight {
                h.text_el("span", &[("class", Some("badge"))], "Highlight");
            }
        });
        optional(h, "h3", "session-title", session.title.as_deref());
        optional(h, "p", "session-journal", session.journal.as_deref());
        optional(h, "p", "session-authors", session.authors.as_deref());
        if let Some(presenter) = &session.presenter {
            h.text_el("p", &[("class", Some("session-presenter"))], &format!("Presented by {presenter}"));
        }

        if session.has_details() {
            h.el("div", &[("class", Some("session-details"))], |h| {
                optional(h, "p", "session-notes", session.notes.as_deref());
                if let Some(abstract_text) = &session.abstract_text {
                    h.el("details", &[], |h| {
                        h.text_el("summary", &[], "Abstract");
                        h.text_el("p", &[], abstract_text);
                    });
                }
            });
        }

        for image in &session.images {
            let Some(src) = safe_url(&image.url) else {
                continue;
            };
            h.el("figure", &[], |h| {
                h.void("img", &[("src", Some(src)), ("alt", Some(image.caption.as_str())), ("loading", Some("lazy"))]);
                if !image.caption.is_empty() {
                    h.text_el("figcaption", &[], &image.caption);
                }
            });
        }

        links(h, session);
        subject_tags(h, session);
    });
}
