//! Data model for the COVID-19 tracker.
//!
//! - **field**: the column vocabulary of the daily per-country dataset
//! - **observation**: typed row views ([`Observation`], [`DerivedMetrics`])
//! - **table**: [`DatasetTable`], the Polars-backed table every stage passes on
//! - **options**: [`PipelineOptions`] describing one pipeline invocation

pub mod error;
pub mod field;
pub mod observation;
pub mod options;
pub mod table;

pub use error::{DataError, Result};
pub use field::{Field, smoothed_column_name};
pub use observation::{DerivedMetrics, Observation};
pub use options::{DEFAULT_COUNTRIES, DEFAULT_WINDOW, PipelineOptions, SmoothingOptions};
pub use table::DatasetTable;
