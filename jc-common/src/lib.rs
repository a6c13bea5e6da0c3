//! # Journal Club Common Library
//!
//! Shared code for the Journal Club site and harvest tooling:
//! - Session data model and normalization
//! - Date parsing for the formats found in curated and exported data
//! - Filter predicate and filter option lists
//! - Summary counters
//! - HTML escaping
//! - Configuration loading

pub mod config;
pub mod date;
pub mod error;
pub mod escape;
pub mod filter;
pub mod options;
pub mod session;
pub mod stats;

pub use error::{Error, Result};
pub use filter::{FilterState, Selection};
pub use options::FilterOptions;
pub use session::{Normalized, RawSession, Session};
pub use stats::SummaryStats;
