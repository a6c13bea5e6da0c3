//! Flip-card deck view

use jc_common::date::short_form;
use jc_common::Session;

use super::markup::{flag, Html};
use super::{empty_state, links, optional, FilterData, NO_ABSTRACT};
use crate::deck::DeckState;

pub fn render_deck(html: &mut Html, sessions: &[&Session], shown: impl Fn(usize) -> bool, deck: &DeckState) {
    let any_shown = sessions.iter().any(|session| shown(session.id));

    if !sessions.is_empty() {
        html.el("div", &[("class", Some("deck-grid")), ("hidden", flag(!any_shown))], |h| {
            for session in sessions {
                card(h, session, shown(session.id), deck);
                h.newline();
            }
        });
    }
    empty_state(html, any_shown);
}

fn card(html: &mut Html, session: &Session, shown: bool, deck: &DeckState) {
    let data = FilterData::new(session);
    let flipped = deck.is_flipped(session.id);
    let focused = deck.is_focused(session.id);

    let class = match (flipped, focused) {
        (_, true) => "flip-card flipped focused",
        (true, false) => "flip-card flipped",
        _ => "flip-card",
    };
    let mut attrs = data.attrs(class, session, shown);
    attrs.push(("tabindex", Some("0")));
    attrs.push(("role", Some("button")));
    attrs.push(("aria-pressed", Some(if flipped { "true" } else { "false" })));

    let iso = session.date.to_string();
    let pmid = session.pmid.as_deref().map(|pmid| format!("PMID: {pmid}"));

    html.el("article", &attrs, |h| {
        h.el("div", &[("class", Some("flip-card-inner"))], |h| {
            h.el("div", &[("class", Some("flip-card-front"))], |h| {
                h.text_el("time", &[("datetime", Some(iso.as_str()))], &short_form(session.date));
                optional(h, "h3", "session-title", session.title.as_deref());
                optional(h, "p", "session-journal", session.journal.as_deref());
                optional(h, "p", "session-pmid", pmid.as_deref());
            });
            h.el("div", &[("class", Some("flip-card-back"))], |h| {
                optional(h, "p", "session-authors", session.authors.as_deref());
                optional(h, "p", "session-notes", session.notes.as_deref());
                h.text_el(
                    "p",
                    &[("class", Some("session-abstract"))],
                    session.abstract_text.as_deref().unwrap_or(NO_ABSTRACT),
                );
                links(h, session);
            });
        });
    });
}
