//! Chart-ready views of a cleaned dataset.
//!
//! Nothing here draws. Each function shapes a [`DatasetTable`] into plain,
//! serializable data that a plotting front end can consume:
//!
//! - [`missing_value_profile`]: absent cells per column
//! - [`latest_snapshot`]: rows on the most recent date
//! - [`country_overview`]: per-country span and latest values
//! - [`top_n`] and [`share_of_total`]: bar and pie chart inputs
//! - [`country_series`]: per-country line chart points
//! - [`choropleth_layer`]: map values keyed on `iso_code`
//! - [`build_chart_bundle`] and the [`export`] writers
//!
//! [`DatasetTable`]: covid_model::DatasetTable

pub mod bundle;
pub mod choropleth;
pub mod error;
pub mod export;
pub mod overview;
pub mod profile;
pub mod ranking;
pub mod series;
pub mod snapshot;

pub use bundle::{
    ChartBundle, ChartOptions, DEFAULT_TOP_N, LineChart, RankingChart, ShareChart,
    build_chart_bundle,
};
pub use choropleth::{
    ChoroplethCell, ChoroplethLayer, ChoroplethSpec, choropleth_layer, normalize,
};
pub use error::{ReportError, Result};
pub use export::{write_chart_bundle, write_table_csv};
pub use overview::{CountryOverview, country_overview};
pub use profile::{ColumnProfile, missing_value_profile};
pub use ranking::{RankedValue, Share, share_of_total, top_n};
pub use series::{CountrySeries, LineChartSpec, SeriesPoint, country_series, line_chart_specs};
pub use snapshot::{latest_date, latest_snapshot};
