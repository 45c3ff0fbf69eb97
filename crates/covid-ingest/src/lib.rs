//! Dataset acquisition for the COVID-19 tracker.
//!
//! This crate turns a daily per-country statistics file into a conformed
//! [`RecordSet`]. It is the only place that performs I/O before the pure
//! transformation pipeline runs.
//!
//! # Features
//!
//! - **Source fallback**: read a local CSV, or fetch it from a remote URL
//!   when the local file does not exist
//! - **CSV parsing**: every column is read as text by Polars
//! - **Schema conformance**: required columns are checked, numeric columns
//!   parsed to `Float64`, dates normalized to `YYYY-MM-DD`
//!
//! # Example
//!
//! ```ignore
//! use covid_ingest::{DataSource, HttpFetcher, load_record_set};
//!
//! let source = DataSource::default();
//! let records = load_record_set(&source, &HttpFetcher::new()?)?;
//! println!("{} rows from {}", records.height(), records.origin());
//! ```

mod csv;
mod error;
mod record_set;
mod schema;
mod source;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{read_csv_bytes, read_csv_file};

// === Schema ===
pub use schema::conform_schema;

// === Sources ===
pub use record_set::{RecordSet, SourceOrigin};
pub use source::{
    DEFAULT_DATA_PATH, DEFAULT_DATA_URL, DataSource, HttpFetcher, RemoteFetcher, load_record_set,
};
