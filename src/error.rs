//! Error types for meterstat
//!
//! This module defines the error types used throughout the meterstat library.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! The taxonomy distinguishes a source file without the interval header
//! (skipped, siblings still ingest) from malformed date/time fields (the
//! offending row is dropped) and from I/O failures (the whole batch fails and
//! nothing is committed).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for meterstat operations
#[derive(Error, Debug)]
pub enum MeterstatError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error (persisted store)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The export has no interval header line
    #[error("no interval header line found in {file}")]
    MalformedSource {
        /// The file that caused the error
        file: String,
    },

    /// Unparsable date or time components in a row
    #[error("invalid timestamp field '{field}': {detail}")]
    InvalidTimestamp {
        /// The offending field value
        field: String,
        /// What failed to parse
        detail: String,
    },

    /// Invalid date filter format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// No CSV exports found under a directory
    #[error("no CSV exports found under {0}")]
    NoExports(PathBuf),
}

/// Convenience type alias for Results in meterstat
pub type Result<T> = std::result::Result<T, MeterstatError>;
