//! Error types for dataset acquisition.

use std::path::PathBuf;

use covid_model::DataError;
use thiserror::Error;

/// Errors that can occur while acquiring and conforming a dataset.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Local CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Remote Errors ===
    /// The HTTP client could not be configured.
    #[error("failed to create HTTP client: {message}")]
    HttpClient { message: String },

    /// The HTTP request could not be completed.
    #[error("failed to fetch {url}: {message}")]
    Remote { url: String, message: String },

    /// The server answered with a non-success status.
    #[error("failed to fetch {url}: HTTP {status}")]
    RemoteStatus { url: String, status: u16 },

    // === CSV Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV from {origin}: {message}")]
    CsvParse { origin: String, message: String },

    /// Source has no content at all, not even a header row.
    #[error("CSV source is empty: {origin}")]
    EmptyCsv { origin: String },

    // === Schema Errors ===
    /// Required columns absent from the source.
    #[error("missing required column(s) {} in {origin}", .fields.join(", "))]
    MissingFields { fields: Vec<String>, origin: String },

    /// Failed dataset operation.
    #[error(transparent)]
    Data(#[from] DataError),
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::Data(err.into())
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
