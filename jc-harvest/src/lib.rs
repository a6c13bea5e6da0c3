//! jc-harvest library - journal club data pipeline
//!
//! Turns PubMed exports and the curated `sessions.csv` into the site's data
//! file:
//! - `populate`: merge export articles into `sessions.csv`
//! - `build`: assemble `data/journal_club.json` from `sessions.csv`
//! - `tag`: assign subject categories and write `subject_summary.json`

use serde::Serialize;
use std::path::Path;

pub mod assemble;
pub mod curated;
pub mod ent;
pub mod error;
pub mod populate;
pub mod tagger;

pub use error::{HarvestError, Result};

/// Curated session table, relative to the root folder
pub const SESSIONS_FILE: &str = "sessions.csv";
/// Per-month subject counts, relative to the root folder
pub const SUBJECT_SUMMARY_FILE: &str = "data/subject_summary.json";

/// Version, commit, build time and profile captured at compile time
pub fn build_label() -> String {
    format!(
        "v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    )
}

/// PubMed article page for a PMID (empty when there is no PMID)
pub fn pubmed_url(pmid: &str) -> String {
    if pmid.is_empty() {
        String::new()
    } else {
        format!("https://pubmed.ncbi.nlm.nih.gov/{pmid}/")
    }
}

/// Write pretty-printed JSON with a trailing newline, creating parent folders
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    std::fs::write(path, text)?;
    Ok(())
}
