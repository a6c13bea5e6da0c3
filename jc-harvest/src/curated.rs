//! Curated `sessions.csv` rows
//!
//! The CSV is hand-edited, so every column is optional and lookups of a
//! missing column yield an empty string.

use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;

/// Columns `populate` always writes, in order
pub const SESSION_COLUMNS: [&str; 10] = [
    "date", "presenter", "pmid", "title", "journal", "authors", "doi", "abstract", "notes", "pdf",
];

/// One curated row, keyed by header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CuratedRow {
    fields: HashMap<String, String>,
}

impl CuratedRow {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Trimmed value of a column, empty when absent
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(|v| v.trim()).unwrap_or("")
    }

    pub fn pmid(&self) -> &str {
        self.get("pmid")
    }
}

/// Curated rows in file order, plus the header as written
#[derive(Debug, Clone, Default)]
pub struct CuratedSessions {
    pub headers: Vec<String>,
    pub rows: Vec<CuratedRow>,
}

impl CuratedSessions {
    /// Read `sessions.csv`; a missing file is an empty table
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        Self::from_reader(reader)
    }

    pub fn from_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row = CuratedRow::from_pairs(
                headers.iter().map(String::as_str).zip(record.iter()),
            );
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Rows keyed by PMID; a later row for the same PMID replaces an earlier one
    pub fn by_pmid(&self) -> HashMap<&str, &CuratedRow> {
        self.rows
            .iter()
            .filter(|row| !row.pmid().is_empty())
            .map(|row| (row.pmid(), row))
            .collect()
    }

    /// Headers beyond the standard columns, in file order
    pub fn extra_columns(&self) -> Vec<&str> {
        self.headers
            .iter()
            .map(String::as_str)
            .filter(|h| !h.is_empty() && !SESSION_COLUMNS.contains(h))
            .collect()
    }
}
