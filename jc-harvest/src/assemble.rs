//! `build`: assemble `data/journal_club.json` from curated rows and exports

use chrono::Datelike;
use jc_common::date::{normalize_date_string, parse_session_date};
use jc_common::session::{is_truthy, split_list, MonthlySummary, SessionImage};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::curated::{CuratedRow, CuratedSessions};
use crate::ent::{Duplicates, ExportIndex};
use crate::error::Result;
use crate::{pubmed_url, write_json, SESSIONS_FILE};

/// One session as written to the data file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRecord {
    pub date: String,
    pub presenter: String,
    pub title: String,
    pub journal: String,
    pub authors: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub doi: String,
    pub pmid: String,
    pub pdf: String,
    pub notes: String,
    pub subjects: Vec<String>,
    pub highlight: bool,
    pub analysis: String,
    pub images: Vec<SessionImage>,
}

/// The data file document
#[derive(Debug, Clone, Default, Serialize)]
pub struct Assembled {
    /// Newest first
    pub sessions: Vec<SessionRecord>,
    /// Newest month first
    pub monthly_summaries: Vec<MonthlySummary>,
    /// Curated PMIDs with no exported article
    #[serde(skip)]
    pub missing: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct BuildReport {
    pub sessions: usize,
    pub summaries: usize,
    pub skipped: usize,
    pub path: PathBuf,
}

/// Flag parsing for curated columns
pub fn parse_bool(value: &str) -> bool {
    is_truthy(value)
}

/// Subjects separated by `;` and/or `,`
pub fn parse_subjects(value: &str) -> Vec<String> {
    split_list(value)
}

/// Highlights separated by `;` or newlines
pub fn parse_highlights(value: &str) -> Vec<String> {
    value
        .split([';', '\n'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Images from a curated cell.
///
/// Accepts JSON (a list or a single entry; entries are URL strings or
/// objects with `url`/`src` and `caption`/`alt`), or `url|caption` /
/// `url,caption` entries separated by `;` or newlines. Entries without a URL
/// are dropped.
pub fn parse_images(value: &str) -> Vec<SessionImage> {
    let text = value.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let entries: Vec<Value> = match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => items,
        Ok(single) => vec![single],
        Err(_) => text
            .split([';', '\n'])
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let (url, caption) = entry
                    .split_once('|')
                    .or_else(|| entry.split_once(','))
                    .unwrap_or((entry, ""));
                serde_json::json!({"url": url.trim(), "caption": caption.trim()})
            })
            .collect(),
    };

    entries.iter().filter_map(image_from_value).collect()
}

fn image_from_value(value: &Value) -> Option<SessionImage> {
    let (url, caption) = match value {
        Value::String(url) => (url.trim().to_string(), String::new()),
        Value::Object(fields) => {
            let text = |keys: [&str; 2]| {
                keys.iter()
                    .filter_map(|key| fields.get(*key).and_then(Value::as_str))
                    .map(str::trim)
                    .find(|s| !s.is_empty())
                    .unwrap_or("")
                    .to_string()
            };
            (text(["url", "src"]), text(["caption", "alt"]))
        }
        _ => return None,
    };
    (!url.is_empty()).then_some(SessionImage { url, caption })
}

/// `YYYY-MM` from a summary month cell, falling back to the session date.
///
/// Unparsable months keep their first seven characters.
pub fn normalize_month(month: &str, date_iso: &str) -> String {
    let raw = month.trim();
    if raw.is_empty() {
        return date_iso.chars().take(7).collect();
    }
    match parse_session_date(raw) {
        Some(date) => format!("{:04}-{:02}", date.year(), date.month()),
        None => raw.chars().take(7).collect(),
    }
}

/// Build the document; rows whose PMID has no exported article are skipped
pub fn assemble(index: &ExportIndex, curated: &CuratedSessions) -> Assembled {
    let mut sessions = Vec::new();
    let mut summaries: BTreeMap<String, MonthlySummary> = BTreeMap::new();
    let mut missing = Vec::new();

    for row in &curated.rows {
        let pmid = row.pmid();
        let Some(article) = index.get(pmid) else {
            warn!("PMID {} from {} not found in any export", pmid, SESSIONS_FILE);
            missing.push(pmid.to_string());
            continue;
        };

        let override_or = |column: &str, exported: &str| -> String {
            match row.get(column) {
                "" => article.text(exported),
                value => value.to_string(),
            }
        };

        let date_source = match row.get("date") {
            "" => article.publication_date(),
            value => value.to_string(),
        };
        let date = normalize_date_string(&date_source);

        if let Some(summary) = monthly_summary(row, &date) {
            summaries.entry(summary.month.clone()).or_insert(summary);
        }

        sessions.push(SessionRecord {
            presenter: row.get("presenter").to_string(),
            title: override_or("title", "Title"),
            journal: override_or("journal", "Journal"),
            authors: override_or("authors", "Authors"),
            abstract_text: override_or("abstract", "Abstract"),
            doi: article.text("DOI"),
            pmid: pmid.to_string(),
            pdf: match row.get("pdf") {
                "" => pubmed_url(pmid),
                pdf => pdf.to_string(),
            },
            notes: row.get("notes").to_string(),
            subjects: parse_subjects(row.get("subjects")),
            highlight: parse_bool(row.get("highlight")),
            analysis: row.get("analysis").to_string(),
            images: parse_images(row.get("images")),
            date,
        });
    }

    // Stable: rows sharing a date keep their curated order
    sessions.sort_by(|a, b| b.date.cmp(&a.date));

    Assembled {
        sessions,
        monthly_summaries: summaries.into_values().rev().collect(),
        missing,
    }
}

/// Summary columns of a row; `None` when they are all blank
fn monthly_summary(row: &CuratedRow, date_iso: &str) -> Option<MonthlySummary> {
    let month = normalize_month(row.get("summary_month"), date_iso);
    let headline = row.get("summary_headline").to_string();
    let paragraph = row.get("summary_paragraph").to_string();
    let key_highlights = parse_highlights(row.get("summary_highlights"));

    if month.is_empty() || (headline.is_empty() && paragraph.is_empty() && key_highlights.is_empty()) {
        return None;
    }
    Some(MonthlySummary {
        month,
        headline,
        paragraph,
        key_highlights,
    })
}

/// Write `ROOT/data/journal_club.json` (or `out`) from `ROOT/sessions.csv`
pub fn build(root: &Path, out: &Path) -> Result<BuildReport> {
    let index = ExportIndex::load(root, Duplicates::KeepLast)?;
    let curated = CuratedSessions::load(&root.join(SESSIONS_FILE))?;

    let assembled = assemble(&index, &curated);
    write_json(out, &assembled)?;

    info!(
        "Wrote {} sessions and {} summaries to {}",
        assembled.sessions.len(),
        assembled.monthly_summaries.len(),
        out.display()
    );
    Ok(BuildReport {
        sessions: assembled.sessions.len(),
        summaries: assembled.monthly_summaries.len(),
        skipped: assembled.missing.len(),
        path: out.to_path_buf(),
    })
}
