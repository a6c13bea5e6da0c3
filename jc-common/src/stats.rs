//! Summary counters shown in the page header
//!
//! Computed over the full catalog once per load, never over a filtered view.

use serde::Serialize;
use std::collections::HashSet;

use crate::session::Session;

/// Placeholder shown for the latest year when the catalog is empty
pub const NO_YEAR: &str = "—";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub total_sessions: usize,
    pub journals: usize,
    pub presenters: usize,
    pub latest_year: Option<i32>,
}

impl SummaryStats {
    pub fn from_sessions(sessions: &[Session]) -> Self {
        let journals: HashSet<&str> = sessions.iter().filter_map(|s| s.journal.as_deref()).collect();
        let presenters: HashSet<&str> =
            sessions.iter().filter_map(|s| s.presenter.as_deref()).collect();

        Self {
            total_sessions: sessions.len(),
            journals: journals.len(),
            presenters: presenters.len(),
            latest_year: sessions.iter().map(|s| s.year).max(),
        }
    }

    /// Latest year as displayed, or the dash placeholder
    pub fn latest_year_label(&self) -> String {
        self.latest_year
            .map(|year| year.to_string())
            .unwrap_or_else(|| NO_YEAR.to_string())
    }
}
