//! Session data model and normalization
//!
//! The data document is untrusted: it may be hand-edited, produced by an older
//! harvest run, or simply broken. [`RawSession`] is the permissive partial
//! schema (every field optional, scalars coerced to text), and
//! [`normalize_document`] converts raw records into typed [`Session`]s.
//! Records whose date cannot be parsed are dropped, and every drop is
//! reported in [`Normalized::dropped`] so callers can log it.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::date::parse_session_date;

/// Image attached to a session (figure, slide screenshot)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionImage {
    pub url: String,
    #[serde(default)]
    pub caption: String,
}

/// Raw record as found in the data document.
///
/// Every field is optional. Text fields accept strings, numbers and booleans;
/// `null` and blank strings are treated as absent. Fields this struct does not
/// know about are kept in `extra` and carried forward unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSession {
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub journal: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub authors: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub presenter: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub notes: Option<String>,
    #[serde(default, rename = "abstract", deserialize_with = "lenient_text")]
    pub abstract_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub pmid: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub pdf: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub doi: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub analysis: Option<String>,
    #[serde(default, deserialize_with = "lenient_subjects")]
    pub subjects: Vec<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub highlight: bool,
    #[serde(default, deserialize_with = "lenient_images")]
    pub images: Vec<SessionImage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Normalized session record.
///
/// Immutable once built; the derived `year` and `month_index` always agree
/// with `date`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    /// Position in the sorted catalog (also the deck card id)
    pub id: usize,
    pub date: NaiveDate,
    pub date_raw: String,
    pub year: i32,
    /// Zero-based month (January = 0)
    pub month_index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presenter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pmid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    pub subjects: Vec<String>,
    pub highlight: bool,
    pub images: Vec<SessionImage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields computed during normalization; raw values under these names are discarded
pub const DERIVED_FIELDS: [&str; 4] = ["id", "date_raw", "year", "month_index"];

impl Session {
    /// Build a session from a raw record and its already-parsed date
    pub fn from_raw(raw: RawSession, date: NaiveDate) -> Self {
        let mut extra = raw.extra;
        extra.retain(|key, _| !DERIVED_FIELDS.contains(&key.as_str()));

        Self {
            id: 0,
            year: date.year(),
            month_index: date.month0(),
            date,
            date_raw: raw.date.unwrap_or_default(),
            title: raw.title,
            journal: raw.journal,
            authors: raw.authors,
            presenter: raw.presenter,
            notes: raw.notes,
            abstract_text: raw.abstract_text,
            pmid: raw.pmid,
            pdf: raw.pdf,
            doi: raw.doi,
            analysis: raw.analysis,
            subjects: raw.subjects,
            highlight: raw.highlight,
            images: raw.images,
            extra,
        }
    }

    /// PubMed landing page, when the session has a PMID
    pub fn pubmed_url(&self) -> Option<String> {
        self.pmid
            .as_deref()
            .map(|pmid| format!("https://pubmed.ncbi.nlm.nih.gov/{pmid}/"))
    }

    /// DOI resolver link, when the session has a DOI
    pub fn doi_url(&self) -> Option<String> {
        self.doi.as_deref().map(|doi| format!("https://doi.org/{doi}"))
    }

    /// True when notes or abstract would produce a detail block
    pub fn has_details(&self) -> bool {
        self.notes.is_some() || self.abstract_text.is_some()
    }
}

/// Month digest written by the harvest tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// `YYYY-MM`
    pub month: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub paragraph: String,
    #[serde(default)]
    pub key_highlights: Vec<String>,
}

/// Why a raw record was left out of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DropReason {
    NotAnObject,
    MissingDate,
    UnparsableDate(String),
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "record is not an object"),
            Self::MissingDate => write!(f, "record has no date"),
            Self::UnparsableDate(text) => write!(f, "unparsable date {text:?}"),
        }
    }
}

/// A raw record that did not survive normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedRecord {
    /// Index of the record in the source array
    pub index: usize,
    pub reason: DropReason,
}

/// Result of normalizing a data document
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    /// Retained sessions, sorted newest first
    pub sessions: Vec<Session>,
    /// Monthly summaries, newest first
    pub summaries: Vec<MonthlySummary>,
    /// Records excluded during normalization
    pub dropped: Vec<DroppedRecord>,
}

/// Normalize a parsed data document.
///
/// The document is either a bare array of records or an object with a
/// `sessions` array (and optionally `monthly_summaries`). Any other shape
/// yields an empty result; this function never fails.
pub fn normalize_document(document: &Value) -> Normalized {
    let (records, summaries) = match document {
        Value::Array(items) => (items.as_slice(), None),
        Value::Object(map) => match map.get("sessions") {
            Some(Value::Array(items)) => (items.as_slice(), map.get("monthly_summaries")),
            _ => return Normalized::default(),
        },
        _ => return Normalized::default(),
    };

    let mut normalized = normalize_records(records);
    normalized.summaries = summaries.map(parse_summaries).unwrap_or_default();
    normalized
}

/// Normalize a slice of raw records and sort the survivors newest first
pub fn normalize_records(records: &[Value]) -> Normalized {
    let mut sessions = Vec::with_capacity(records.len());
    let mut dropped = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match normalize_record(record) {
            Ok(session) => sessions.push(session),
            Err(reason) => dropped.push(DroppedRecord { index, reason }),
        }
    }

    sort_sessions(&mut sessions);

    Normalized {
        sessions,
        summaries: Vec::new(),
        dropped,
    }
}

/// Convert one raw record, reporting why it was rejected
pub fn normalize_record(record: &Value) -> Result<Session, DropReason> {
    if !record.is_object() {
        return Err(DropReason::NotAnObject);
    }

    let raw: RawSession =
        RawSession::deserialize(record).map_err(|_| DropReason::NotAnObject)?;

    let date_text = raw.date.as_deref().ok_or(DropReason::MissingDate)?;
    let date = parse_session_date(date_text)
        .ok_or_else(|| DropReason::UnparsableDate(date_text.to_string()))?;

    Ok(Session::from_raw(raw, date))
}

/// Sort newest first and assign catalog ids.
///
/// The sort is stable, so sessions sharing a date keep document order.
pub fn sort_sessions(sessions: &mut [Session]) {
    sessions.sort_by(|a, b| b.date.cmp(&a.date));
    for (id, session) in sessions.iter_mut().enumerate() {
        session.id = id;
    }
}

fn parse_summaries(value: &Value) -> Vec<MonthlySummary> {
    let mut summaries: Vec<MonthlySummary> = value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| MonthlySummary::deserialize(item).ok())
                .filter(|summary| !summary.month.trim().is_empty())
                .collect()
        })
        .unwrap_or_default();
    summaries.sort_by(|a, b| b.month.cmp(&a.month));
    summaries
}

/// Scalar → trimmed text; null, blank and structured values → `None`
fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value))
}

fn lenient_subjects<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let subjects = match value {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        Value::String(text) => split_list(&text),
        _ => Vec::new(),
    };
    Ok(subjects)
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => is_truthy(&s),
        _ => false,
    })
}

fn lenient_images<'de, D>(deserializer: D) -> Result<Vec<SessionImage>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let images = value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(url) if !url.trim().is_empty() => Some(SessionImage {
                        url: url.trim().to_string(),
                        caption: String::new(),
                    }),
                    Value::Object(_) => SessionImage::deserialize(item)
                        .ok()
                        .filter(|image| !image.url.trim().is_empty()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();
    Ok(images)
}

/// Split a `,` / `;` separated list, dropping blanks
pub fn split_list(text: &str) -> Vec<String> {
    text.split([',', ';'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Truthy spellings accepted for flags such as `highlight`
pub fn is_truthy(text: &str) -> bool {
    matches!(
        text.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "highlight" | "t"
    )
}
