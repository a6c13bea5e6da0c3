//! Filter option lists derived from the session catalog

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::date::month_name;
use crate::filter::{FilterState, Selection, ALL};
use crate::session::Session;

/// Distinct selectable values per filter dimension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Ascending
    pub years: Vec<i32>,
    /// Zero-based month indices, ascending
    pub months: Vec<u32>,
    /// Case-insensitive alphabetical
    pub journals: Vec<String>,
    pub presenters: Vec<String>,
    pub subjects: Vec<String>,
}

/// One `<option>` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl FilterOptions {
    /// Collect the distinct values present in the catalog
    pub fn from_sessions(sessions: &[Session]) -> Self {
        let years: BTreeSet<i32> = sessions.iter().map(|s| s.year).collect();
        let months: BTreeSet<u32> = sessions.iter().map(|s| s.month_index).collect();

        Self {
            years: years.into_iter().collect(),
            months: months.into_iter().collect(),
            journals: distinct_text(sessions.iter().filter_map(|s| s.journal.as_deref())),
            presenters: distinct_text(sessions.iter().filter_map(|s| s.presenter.as_deref())),
            subjects: distinct_text(sessions.iter().flat_map(|s| s.subjects.iter().map(String::as_str))),
        }
    }

    /// Presenter selector is only offered when the data carries presenters
    pub fn has_presenters(&self) -> bool {
        !self.presenters.is_empty()
    }

    pub fn has_subjects(&self) -> bool {
        !self.subjects.is_empty()
    }

    /// Reset every selection that is no longer offered back to "all"
    pub fn reconcile(&self, state: FilterState) -> FilterState {
        FilterState {
            year: state.year.reconcile(&self.years),
            month: state.month.reconcile(&self.months),
            journal: state.journal.reconcile(&self.journals),
            presenter: state.presenter.reconcile(&self.presenters),
            subject: state.subject.reconcile(&self.subjects),
            search: state.search,
        }
    }

    pub fn year_options(&self, selected: &Selection<i32>) -> Vec<SelectOption> {
        select_options("All years", &self.years, selected, |y| y.to_string())
    }

    pub fn month_options(&self, selected: &Selection<u32>) -> Vec<SelectOption> {
        select_options("All months", &self.months, selected, |m| month_name(*m).to_string())
    }

    pub fn journal_options(&self, selected: &Selection<String>) -> Vec<SelectOption> {
        select_options("All journals", &self.journals, selected, String::clone)
    }

    pub fn presenter_options(&self, selected: &Selection<String>) -> Vec<SelectOption> {
        select_options("All presenters", &self.presenters, selected, String::clone)
    }

    pub fn subject_options(&self, selected: &Selection<String>) -> Vec<SelectOption> {
        select_options("All subjects", &self.subjects, selected, String::clone)
    }
}

/// Build an option list with the "all" sentinel first.
///
/// The caller is expected to pass a reconciled selection; a stale value simply
/// leaves "all" selected.
fn select_options<T, F>(
    all_label: &str,
    values: &[T],
    selected: &Selection<T>,
    label: F,
) -> Vec<SelectOption>
where
    T: PartialEq + ToString,
    F: Fn(&T) -> String,
{
    let chosen = selected.as_only().filter(|value| values.contains(value));

    let mut options = Vec::with_capacity(values.len() + 1);
    options.push(SelectOption {
        value: ALL.to_string(),
        label: all_label.to_string(),
        selected: chosen.is_none(),
    });
    options.extend(values.iter().map(|value| SelectOption {
        value: value.to_string(),
        label: label(value),
        selected: chosen == Some(value),
    }));
    options
}

fn distinct_text<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let unique: BTreeSet<&str> = values.collect();
    let mut sorted: Vec<String> = unique.into_iter().map(str::to_string).collect();
    sorted.sort_by(|a, b| collate(a, b));
    sorted
}

/// Case-insensitive ordering with the raw string as tie-breaker
pub fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
