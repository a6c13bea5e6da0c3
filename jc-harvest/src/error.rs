//! Error types for jc-harvest

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// File could be read but does not have the expected shape
    #[error("Invalid document {path}: {reason}")]
    InvalidDocument { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, HarvestError>;
