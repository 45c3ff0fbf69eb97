//! Cleaning and metric derivation for per-country daily statistics.
//!
//! Stages, in pipeline order:
//!
//! - **select**: keep the requested countries
//! - **impute**: forward-fill absent values within each country
//! - **derive**: add `death_rate` and `vaccination_rate`
//! - **smooth**: add a trailing rolling mean of one field
//! - **clean**: drop rows lacking required fields
//!
//! Every stage takes a [`DatasetTable`](covid_model::DatasetTable) by
//! reference and returns a new one. Per-country work goes through
//! [`partition::partition_by_country`], so no value is ever read across a
//! country boundary.

pub mod clean;
pub mod derive;
pub mod impute;
pub mod partition;
pub mod pipeline;
pub mod select;
pub mod smooth;
pub mod stage;

pub use clean::drop_incomplete;
pub use derive::{derive_metrics, ratio};
pub use impute::{FillReport, forward_fill, forward_fill_report, forward_fill_series};
pub use partition::{CountryGroup, CountryPartition, partition_by_country};
pub use pipeline::{PipelineOutput, PipelineStats, run_pipeline};
pub use select::select;
pub use smooth::{rolling_mean, trailing_mean};
pub use stage::Stage;
