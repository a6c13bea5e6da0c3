//! Filter state and the session filter predicate
//!
//! Every structured dimension is either "all" (no constraint) or an exact
//! match. Free-text search is a case-insensitive substring match over the
//! session's descriptive fields. All constraints are ANDed.

use serde::{Deserialize, Serialize, Serializer};
use std::str::FromStr;

use crate::session::Session;

/// Value of the sentinel "all" option
pub const ALL: &str = "all";

/// One selector's value: no constraint, or an exact match
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: Serialize> Serialize for Selection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Selection::All => serializer.serialize_str(ALL),
            Selection::Only(value) => value.serialize(serializer),
        }
    }
}

impl<T> Selection<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn as_only(&self) -> Option<&T> {
        match self {
            Selection::All => None,
            Selection::Only(value) => Some(value),
        }
    }
}

impl<T: PartialEq> Selection<T> {
    /// Exact-match test; an absent field never matches a specific value
    pub fn accepts(&self, field: Option<&T>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => field == Some(wanted),
        }
    }

    /// Keep the selection if it is still offered, otherwise fall back to `All`
    pub fn reconcile(self, available: &[T]) -> Self {
        match self {
            Selection::Only(value) if available.contains(&value) => Selection::Only(value),
            _ => Selection::All,
        }
    }
}

impl<T: FromStr> Selection<T> {
    /// Parse a selector value from a query parameter.
    ///
    /// Missing, blank, `all` and unparsable values all mean "no constraint".
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Selection::All,
            Some(text) if text.eq_ignore_ascii_case(ALL) => Selection::All,
            Some(text) => text.parse().map(Selection::Only).unwrap_or(Selection::All),
        }
    }
}

impl<T: ToString> Selection<T> {
    /// Value as used in `<option value=..>` and query strings
    pub fn to_param(&self) -> String {
        match self {
            Selection::All => ALL.to_string(),
            Selection::Only(value) => value.to_string(),
        }
    }
}

/// Query-string form of the filter state
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    pub year: Option<String>,
    pub month: Option<String>,
    pub journal: Option<String>,
    pub presenter: Option<String>,
    pub subject: Option<String>,
    pub q: Option<String>,
}

/// Active selector values plus the free-text search term
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FilterState {
    pub year: Selection<i32>,
    /// Zero-based month index
    pub month: Selection<u32>,
    pub journal: Selection<String>,
    pub presenter: Selection<String>,
    pub subject: Selection<String>,
    pub search: String,
}

impl From<&FilterQuery> for FilterState {
    fn from(query: &FilterQuery) -> Self {
        Self {
            year: Selection::parse(query.year.as_deref()),
            month: Selection::<u32>::parse(query.month.as_deref()).reconcile(&(0..12).collect::<Vec<_>>()),
            journal: Selection::parse(query.journal.as_deref()),
            presenter: Selection::parse(query.presenter.as_deref()),
            subject: Selection::parse(query.subject.as_deref()),
            search: query.q.as_deref().unwrap_or_default().trim().to_string(),
        }
    }
}

impl FilterState {
    /// True when nothing constrains the listing
    pub fn is_unfiltered(&self) -> bool {
        self.year.is_all()
            && self.month.is_all()
            && self.journal.is_all()
            && self.presenter.is_all()
            && self.subject.is_all()
            && self.search.is_empty()
    }

    /// Decide whether a session passes every active constraint
    pub fn matches(&self, session: &Session) -> bool {
        self.year.accepts(Some(&session.year))
            && self.month.accepts(Some(&session.month_index))
            && self.journal.accepts(session.journal.as_ref())
            && self.presenter.accepts(session.presenter.as_ref())
            && self.matches_subject(session)
            && self.matches_search(session)
    }

    fn matches_subject(&self, session: &Session) -> bool {
        match &self.subject {
            Selection::All => true,
            Selection::Only(subject) => session.subjects.iter().any(|s| s == subject),
        }
    }

    fn matches_search(&self, session: &Session) -> bool {
        if self.search.is_empty() {
            return true;
        }
        search_haystack(session).contains(&self.search.to_lowercase())
    }
}

/// Lowercased, space-joined text searched by the free-text filter.
///
/// Absent fields are omitted before joining.
pub fn search_haystack(session: &Session) -> String {
    [
        &session.title,
        &session.journal,
        &session.authors,
        &session.presenter,
        &session.notes,
        &session.abstract_text,
    ]
    .into_iter()
    .filter_map(|field| field.as_deref())
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

/// Evaluate the filter over the full session list, preserving order
pub fn filter_sessions<'a>(sessions: &'a [Session], state: &FilterState) -> Vec<&'a Session> {
    sessions.iter().filter(|session| state.matches(session)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::normalize_record;
    use serde_json::json;

    fn laryngoscope_2024() -> Session {
        normalize_record(&json!({
            "date": "2024-05-14",
            "title": "Endoscopic Sinus Surgery Outcomes",
            "journal": "Laryngoscope",
            "authors": "Smith J, Doe A",
            "notes": "Discussed revision rates",
            "subjects": ["Rhinology & Allergy"]
        }))
        .unwrap()
    }

    #[test]
    fn test_and_composition() {
        let session = laryngoscope_2024();

        let both = FilterState {
            journal: Selection::Only("Laryngoscope".into()),
            year: Selection::Only(2023),
            ..Default::default()
        };
        assert!(!both.matches(&session));

        let journal_only = FilterState {
            journal: Selection::Only("Laryngoscope".into()),
            ..Default::default()
        };
        assert!(journal_only.matches(&session));

        let year_only = FilterState {
            year: Selection::Only(2024),
            ..Default::default()
        };
        assert!(year_only.matches(&session));
    }

    #[test]
    fn test_search_case_insensitive_substring() {
        let session = laryngoscope_2024();
        for term in ["sinus", "SINUS", "Endoscopic sinus", "revision", "doe a"] {
            let state = FilterState {
                search: term.to_string(),
                ..Default::default()
            };
            assert!(state.matches(&session), "{term} should match");
        }

        let state = FilterState {
            search: "rhinoplasty".to_string(),
            ..Default::default()
        };
        assert!(!state.matches(&session));
    }

    #[test]
    fn test_absent_field_excluded_by_specific_filter() {
        let session = laryngoscope_2024();
        let state = FilterState {
            presenter: Selection::Only("Dr. Lee".into()),
            ..Default::default()
        };
        assert!(!state.matches(&session));
        assert!(FilterState::default().matches(&session));
    }

    #[test]
    fn test_month_and_subject() {
        let session = laryngoscope_2024();
        let may = FilterState {
            month: Selection::Only(4),
            subject: Selection::Only("Rhinology & Allergy".into()),
            ..Default::default()
        };
        assert!(may.matches(&session));

        let june = FilterState {
            month: Selection::Only(5),
            ..Default::default()
        };
        assert!(!june.matches(&session));
    }

    #[test]
    fn test_haystack_omits_absent_fields() {
        let session = normalize_record(&json!({"date": "2024-01-01", "title": "A", "notes": "B"})).unwrap();
        assert_eq!(search_haystack(&session), "a b");
    }

    #[test]
    fn test_selection_parse() {
        assert_eq!(Selection::<i32>::parse(None), Selection::All);
        assert_eq!(Selection::<i32>::parse(Some("")), Selection::All);
        assert_eq!(Selection::<i32>::parse(Some("ALL")), Selection::All);
        assert_eq!(Selection::<i32>::parse(Some("abc")), Selection::All);
        assert_eq!(Selection::<i32>::parse(Some("2024")), Selection::Only(2024));
        assert_eq!(
            Selection::<String>::parse(Some("JAMA")),
            Selection::Only("JAMA".to_string())
        );
    }

    #[test]
    fn test_selection_reconcile() {
        let journals = vec!["JAMA".to_string(), "Laryngoscope".to_string()];
        let kept = Selection::Only("JAMA".to_string()).reconcile(&journals);
        assert_eq!(kept, Selection::Only("JAMA".to_string()));

        let reset = Selection::Only("JAMA".to_string()).reconcile(&journals[1..]);
        assert_eq!(reset, Selection::All);
    }

    #[test]
    fn test_query_conversion_rejects_bad_month() {
        let query = FilterQuery {
            month: Some("12".into()),
            q: Some("  Sinus ".into()),
            ..Default::default()
        };
        let state = FilterState::from(&query);
        assert_eq!(state.month, Selection::All);
        assert_eq!(state.search, "Sinus");
    }

    #[test]
    fn test_filter_preserves_order() {
        let sessions = crate::session::normalize_document(&json!([
            {"date": "2025-01-01", "journal": "JAMA"},
            {"date": "2024-06-01", "journal": "JAMA"},
            {"date": "2024-03-01", "journal": "Laryngoscope"},
        ]))
        .sessions;
        let state = FilterState {
            journal: Selection::Only("JAMA".into()),
            ..Default::default()
        };
        let filtered = filter_sessions(&sessions, &state);
        let years: Vec<_> = filtered.iter().map(|s| s.year).collect();
        assert_eq!(years, vec![2025, 2024]);
    }
}
