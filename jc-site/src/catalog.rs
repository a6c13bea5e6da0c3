//! Session catalog: the normalized data file plus everything derived from it
//!
//! A catalog is built once per load and never mutated. Reloading builds a new
//! catalog and swaps it in (see [`crate::AppState::reload`]).

use chrono::{DateTime, Utc};
use jc_common::session::{normalize_document, DroppedRecord, MonthlySummary};
use jc_common::{FilterOptions, Session, SummaryStats};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Message shown above the underlying error when the data file cannot be loaded
pub const LOAD_ERROR_MESSAGE: &str = "Unable to load journal club sessions.";

#[derive(Debug, Clone)]
pub struct Catalog {
    /// Newest first
    pub sessions: Vec<Session>,
    pub summaries: Vec<MonthlySummary>,
    pub options: FilterOptions,
    pub stats: SummaryStats,
    pub dropped: Vec<DroppedRecord>,
    /// Set when the data file could not be read or parsed
    pub load_error: Option<String>,
    pub loaded_at: DateTime<Utc>,
}

impl Catalog {
    /// Build a catalog from a parsed data document
    pub fn from_document(document: &Value) -> Self {
        let normalized = normalize_document(document);
        let options = FilterOptions::from_sessions(&normalized.sessions);
        let stats = SummaryStats::from_sessions(&normalized.sessions);

        Self {
            sessions: normalized.sessions,
            summaries: normalized.summaries,
            options,
            stats,
            dropped: normalized.dropped,
            load_error: None,
            loaded_at: Utc::now(),
        }
    }

    /// Empty catalog remembering why loading failed
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            load_error: Some(message.into()),
            ..Self::from_document(&Value::Array(Vec::new()))
        }
    }

    /// Read and normalize the data file, reporting failures to the caller
    pub async fn try_load(path: &Path) -> jc_common::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let document: Value = serde_json::from_slice(&bytes)?;
        let catalog = Self::from_document(&document);

        for dropped in &catalog.dropped {
            debug!("Dropped record #{}: {}", dropped.index, dropped.reason);
        }
        if !catalog.dropped.is_empty() {
            warn!(
                "{} record(s) in {} were excluded during normalization",
                catalog.dropped.len(),
                path.display()
            );
        }
        info!(
            "Loaded {} sessions ({} monthly summaries) from {}",
            catalog.sessions.len(),
            catalog.summaries.len(),
            path.display()
        );

        Ok(catalog)
    }

    /// Read the data file once; failure yields an empty catalog carrying the error
    pub async fn load(path: &Path) -> Self {
        match Self::try_load(path).await {
            Ok(catalog) => catalog,
            Err(e) => {
                error!("Failed to load {}: {}", path.display(), e);
                Self::failed(e.to_string())
            }
        }
    }

    /// Look up a session by catalog id
    pub fn get(&self, id: usize) -> Option<&Session> {
        self.sessions.get(id)
    }
}
