//! PubMed export index
//!
//! Search exports live at `ROOT/20YY/MM/ent_all_results.json`, each a JSON
//! array of article objects keyed by PubMed's field names (`PMID`, `Title`,
//! `Journal`, `Authors`, `Abstract`, `DOI`, `Publication_Date`).

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{HarvestError, Result};

/// File name of a monthly export
pub const EXPORT_FILE: &str = "ent_all_results.json";

/// Which article wins when a PMID appears in several exports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Duplicates {
    KeepFirst,
    KeepLast,
}

/// One exported article
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Article(Map<String, Value>);

impl Article {
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Field as trimmed text; numbers are rendered, anything else is empty
    pub fn text(&self, field: &str) -> String {
        match self.0.get(field) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    pub fn pmid(&self) -> String {
        self.text("PMID")
    }

    /// `Publication_Date`, or the older `PublicationDate` spelling
    pub fn publication_date(&self) -> String {
        let date = self.text("Publication_Date");
        if date.is_empty() {
            self.text("PublicationDate")
        } else {
            date
        }
    }
}

/// PMID → article across every export under a root folder
#[derive(Debug, Clone, Default)]
pub struct ExportIndex {
    articles: HashMap<String, Article>,
}

impl ExportIndex {
    /// Scan `root` for exports in ascending year/month order
    pub fn load(root: &Path, duplicates: Duplicates) -> Result<Self> {
        let mut index = Self::default();
        for path in export_files(root) {
            debug!("Indexing {}", path.display());
            let text = std::fs::read_to_string(&path)?;
            let articles: Vec<Value> = serde_json::from_str(&text).map_err(|e| HarvestError::InvalidDocument {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            index.extend(articles, duplicates);
        }
        Ok(index)
    }

    /// Add articles; entries without a PMID are skipped
    pub fn extend(&mut self, articles: Vec<Value>, duplicates: Duplicates) {
        for value in articles {
            let Value::Object(fields) = value else {
                continue;
            };
            let article = Article(fields);
            let pmid = article.pmid();
            if pmid.is_empty() {
                continue;
            }
            match duplicates {
                Duplicates::KeepFirst => {
                    self.articles.entry(pmid).or_insert(article);
                }
                Duplicates::KeepLast => {
                    self.articles.insert(pmid, article);
                }
            }
        }
    }

    pub fn get(&self, pmid: &str) -> Option<&Article> {
        self.articles.get(pmid)
    }

    pub fn pmids(&self) -> impl Iterator<Item = &str> {
        self.articles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Export files under `ROOT/20YY/MM/`, sorted by path
pub fn export_files(root: &Path) -> Vec<PathBuf> {
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(3)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| match entry.depth() {
            1 => entry.file_type().is_dir() && is_year_dir(&entry.file_name().to_string_lossy()),
            2 => entry.file_type().is_dir() && is_month_dir(&entry.file_name().to_string_lossy()),
            _ => entry.file_name() == EXPORT_FILE,
        });

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) if entry.depth() == 3 && entry.file_type().is_file() => {
                files.push(entry.into_path());
            }
            Ok(_) => {}
            Err(e) => warn!("Error accessing entry: {}", e),
        }
    }
    files
}

/// `20` followed by two digits
fn is_year_dir(name: &str) -> bool {
    name.len() == 4 && name.starts_with("20") && name.bytes().all(|b| b.is_ascii_digit())
}

/// Two digits, first one `0` or `1`
fn is_month_dir(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() == 2 && matches!(bytes[0], b'0' | b'1') && bytes[1].is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_export(root: &Path, year: &str, month: &str, articles: Value) {
        let dir = root.join(year).join(month);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(EXPORT_FILE), articles.to_string()).unwrap();
    }

    #[test]
    fn test_directory_patterns() {
        assert!(is_year_dir("2025"));
        assert!(!is_year_dir("1999"));
        assert!(!is_year_dir("20x5"));
        assert!(is_month_dir("09"));
        assert!(is_month_dir("12"));
        assert!(!is_month_dir("21"));
        assert!(!is_month_dir("9"));
    }

    #[test]
    fn test_duplicate_policy() {
        let dir = tempfile::tempdir().unwrap();
        write_export(dir.path(), "2024", "01", json!([{"PMID": "1", "Title": "January"}]));
        write_export(dir.path(), "2024", "02", json!([{"PMID": 1, "Title": "February"}, {"Title": "No PMID"}]));
        write_export(dir.path(), "misc", "01", json!([{"PMID": "2", "Title": "Ignored"}]));

        let first = ExportIndex::load(dir.path(), Duplicates::KeepFirst).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first.get("1").unwrap().text("Title"), "January");

        let last = ExportIndex::load(dir.path(), Duplicates::KeepLast).unwrap();
        assert_eq!(last.get("1").unwrap().text("Title"), "February");
        assert!(last.get("2").is_none());
    }

    #[test]
    fn test_publication_date_fallback() {
        let article = Article::from_map(
            json!({"PublicationDate": "2025-Oct-31"}).as_object().cloned().unwrap(),
        );
        assert_eq!(article.publication_date(), "2025-Oct-31");
    }
}
