//! Timeline view: sessions grouped by year, newest year first

use jc_common::date::long_form;
use jc_common::Session;

use super::markup::{flag, Html};
use super::{empty_state, FilterData};

/// Group sessions by year, years descending; order within a year is kept
pub fn group_by_year<'a>(sessions: &[&'a Session]) -> Vec<(i32, Vec<&'a Session>)> {
    let mut groups: Vec<(i32, Vec<&'a Session>)> = Vec::new();
    for &session in sessions {
        match groups.iter_mut().find(|(year, _)| *year == session.year) {
            Some((_, members)) => members.push(session),
            None => groups.push((session.year, vec![session])),
        }
    }
    groups.sort_by(|a, b| b.0.cmp(&a.0));
    groups
}

/// Render the timeline; a year group is hidden when none of its sessions is shown
pub fn render_timeline(html: &mut Html, sessions: &[&Session], shown: impl Fn(usize) -> bool) {
    let mut any_shown = false;
    for (year, members) in group_by_year(sessions) {
        let year_label = year.to_string();
        let group_shown = members.iter().any(|session| shown(session.id));
        any_shown |= group_shown;

        html.el(
            "section",
            &[
                ("class", Some("timeline-year")),
                ("data-year", Some(year_label.as_str())),
                ("hidden", flag(!group_shown)),
            ],
            |h| {
                h.text_el("h2", &[], &year_label);
                h.el("ol", &[], |h| {
                    for session in members {
                        entry(h, session, shown(session.id));
                    }
                });
            },
        );
        html.newline();
    }
    empty_state(html, any_shown);
}

fn entry(html: &mut Html, session: &Session, shown: bool) {
    let data = FilterData::new(session);
    let iso = session.date.to_string();
    let sub_line: Vec<&str> = [session.journal.as_deref(), session.presenter.as_deref()]
        .into_iter()
        .flatten()
        .collect();

    html.el("li", &data.attrs("timeline-entry", session, shown), |h| {
        h.text_el("time", &[("datetime", Some(iso.as_str()))], &long_form(session.date));
        if let Some(title) = &session.title {
            h.text_el("strong", &[("class", Some("timeline-title"))], title);
        }
        if !sub_line.is_empty() {
            h.text_el("span", &[("class", Some("timeline-sub"))], &sub_line.join(" · "));
        }
    });
}
