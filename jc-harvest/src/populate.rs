//! `populate`: merge the export index into `sessions.csv`
//!
//! Every PMID found in an export or already curated gets one row. Curated
//! values win over exported ones, so rerunning never clobbers hand edits.
//! Columns beyond the standard set are carried through unchanged.

use jc_common::date::normalize_date_string;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::curated::{CuratedRow, CuratedSessions, SESSION_COLUMNS};
use crate::ent::{Article, Duplicates, ExportIndex};
use crate::error::Result;
use crate::{pubmed_url, SESSIONS_FILE};

/// Rewritten `sessions.csv` contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTable {
    pub headers: Vec<String>,
    /// Newest first
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct PopulateReport {
    pub rows: usize,
    pub path: PathBuf,
}

/// Merge exported articles with curated rows
pub fn merge(index: &ExportIndex, curated: &CuratedSessions) -> SessionTable {
    let manual = curated.by_pmid();
    let extras = curated.extra_columns();

    let pmids: BTreeSet<&str> = index.pmids().chain(manual.keys().copied()).collect();

    let mut rows: Vec<Vec<String>> = pmids
        .into_iter()
        .map(|pmid| {
            let row = manual.get(pmid).copied();
            let mut values = session_row(pmid, index.get(pmid), row);
            values.extend(extras.iter().map(|column| {
                row.map(|r| r.get(column).to_string()).unwrap_or_default()
            }));
            values
        })
        .collect();

    // Column 0 is the ISO date, so string order is date order
    rows.sort_by(|a, b| b[0].cmp(&a[0]));

    let headers = SESSION_COLUMNS
        .iter()
        .copied()
        .chain(extras.iter().copied())
        .map(str::to_string)
        .collect();

    SessionTable { headers, rows }
}

fn session_row(pmid: &str, article: Option<&Article>, manual: Option<&CuratedRow>) -> Vec<String> {
    let curated = |column: &str| manual.map(|row| row.get(column)).unwrap_or("");
    let pick = |column: &str, exported: &str| -> String {
        let value = curated(column);
        if !value.is_empty() {
            return value.to_string();
        }
        article.map(|a| a.text(exported)).unwrap_or_default()
    };

    let date = {
        let value = curated("date");
        if value.is_empty() {
            article.map(Article::publication_date).unwrap_or_default()
        } else {
            value.to_string()
        }
    };
    let pdf = match curated("pdf") {
        "" => pubmed_url(pmid),
        pdf => pdf.to_string(),
    };

    vec![
        normalize_date_string(&date),
        curated("presenter").to_string(),
        pmid.to_string(),
        pick("title", "Title"),
        pick("journal", "Journal"),
        pick("authors", "Authors"),
        pick("doi", "DOI"),
        pick("abstract", "Abstract"),
        curated("notes").to_string(),
        pdf,
    ]
}

pub fn write_table(path: &Path, table: &SessionTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Rebuild `ROOT/sessions.csv` from the exports under `ROOT`
pub fn populate(root: &Path) -> Result<PopulateReport> {
    let index = ExportIndex::load(root, Duplicates::KeepFirst)?;
    let path = root.join(SESSIONS_FILE);
    let curated = CuratedSessions::load(&path)?;

    let table = merge(&index, &curated);
    write_table(&path, &table)?;

    info!(
        "Wrote {} unique PMIDs to {} ({} from exports, {} curated)",
        table.rows.len(),
        path.display(),
        index.len(),
        curated.rows.len()
    );
    Ok(PopulateReport {
        rows: table.rows.len(),
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn index() -> ExportIndex {
        let mut index = ExportIndex::default();
        index.extend(
            vec![
                json!({"PMID": "100", "Title": "Exported title", "Journal": "JAMA", "Publication_Date": "2024-Oct-31", "DOI": "10.1/a"}),
                json!({"PMID": "200", "Title": "Newer", "Publication_Date": "2025-Jan-02"}),
            ],
            Duplicates::KeepFirst,
        );
        index
    }

    fn curated(text: &str) -> CuratedSessions {
        CuratedSessions::from_reader(csv::Reader::from_reader(text.as_bytes())).unwrap()
    }

    #[test]
    fn test_curated_values_override_export() {
        let table = merge(
            &index(),
            &curated("date,pmid,title,presenter,highlight\n2025-02-01,100,Curated title,Dr. Lee,yes\n"),
        );

        assert_eq!(table.headers.last().map(String::as_str), Some("highlight"));
        let row = table.rows.iter().find(|r| r[2] == "100").unwrap();
        assert_eq!(row[0], "2025-02-01");
        assert_eq!(row[1], "Dr. Lee");
        assert_eq!(row[3], "Curated title");
        assert_eq!(row[4], "JAMA");
        assert_eq!(row[6], "10.1/a");
        assert_eq!(row[9], "https://pubmed.ncbi.nlm.nih.gov/100/");
        assert_eq!(row[10], "yes");
    }

    #[test]
    fn test_union_sorted_newest_first() {
        let table = merge(&index(), &curated("pmid,date,title\n300,2023 spring,Curated only\n"));

        let pmids: Vec<&str> = table.rows.iter().map(|r| r[2].as_str()).collect();
        assert_eq!(pmids, vec!["200", "100", "300"]);
        // Unparsable curated date passes through
        assert_eq!(table.rows[2][0], "2023 spring");
        assert_eq!(table.rows[0][0], "2025-01-02");
    }
}
