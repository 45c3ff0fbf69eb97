//! Error types for report shaping and export.

use std::path::PathBuf;

use covid_model::DataError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// A column the view depends on is missing or unreadable.
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Polars failed while writing CSV.
    #[error("failed to write CSV {path}: {message}")]
    CsvWrite { path: PathBuf, message: String },

    #[error("failed to serialize chart bundle: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
