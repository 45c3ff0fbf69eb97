//! Everything the tracker plots, gathered into one serializable value.

use chrono::NaiveDate;
use covid_model::{DatasetTable, Field, SmoothingOptions};
use serde::Serialize;
use tracing::debug;

use crate::choropleth::{ChoroplethLayer, ChoroplethSpec, choropleth_layer};
use crate::error::Result;
use crate::ranking::{RankedValue, Share, share_of_total, top_n};
use crate::series::{CountrySeries, LineChartSpec, country_series, line_chart_specs};
use crate::snapshot::{latest_date, latest_snapshot};

/// Number of bars in the default ranking.
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub top_n: usize,
    /// Rolling mean the cleaned table was smoothed with, if any.
    pub smoothing: Option<SmoothingOptions>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            smoothing: Some(SmoothingOptions::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    #[serde(flatten)]
    pub spec: LineChartSpec,
    pub series: Vec<CountrySeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingChart {
    pub title: String,
    pub column: String,
    pub date: Option<NaiveDate>,
    pub entries: Vec<RankedValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareChart {
    pub title: String,
    pub column: String,
    pub date: Option<NaiveDate>,
    pub slices: Vec<Share>,
}

/// Chart inputs for one tracker run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBundle {
    /// Most recent date in the full dataset.
    pub latest_date: Option<NaiveDate>,
    pub line_charts: Vec<LineChart>,
    pub ranking: RankingChart,
    pub vaccination_shares: ShareChart,
    pub maps: Vec<ChoroplethLayer>,
}

/// Builds the chart bundle.
///
/// `records` is the full conformed dataset: the ranking and the maps use its
/// latest snapshot across all countries. `cleaned` is the pipeline output: the
/// line charts and the vaccination shares use it. Line charts whose column is
/// not in `cleaned` are left out.
pub fn build_chart_bundle(
    records: &DatasetTable,
    cleaned: &DatasetTable,
    options: &ChartOptions,
) -> Result<ChartBundle> {
    let mut line_charts = Vec::new();
    for spec in line_chart_specs(options.smoothing.as_ref()) {
        if !cleaned.has_column(&spec.column) {
            debug!(column = %spec.column, "line chart skipped");
            continue;
        }
        let series = country_series(cleaned, &spec.column)?;
        line_charts.push(LineChart { spec, series });
    }

    let global = latest_snapshot(records)?;
    let ranking_column = Field::TotalCasesPerMillion.name();
    let ranking = RankingChart {
        title: format!("Top {} Countries by Total Cases per Million", options.top_n),
        column: ranking_column.to_string(),
        date: latest_date(records)?,
        entries: top_n(&global, ranking_column, options.top_n)?,
    };

    let selected = latest_snapshot(cleaned)?;
    let share_column = Field::PeopleVaccinated.name();
    let vaccination_shares = ShareChart {
        title: "Distribution of Vaccinated People Among Selected Countries".to_string(),
        column: share_column.to_string(),
        date: latest_date(cleaned)?,
        slices: share_of_total(&selected, share_column)?,
    };

    let maps = ChoroplethSpec::ALL
        .iter()
        .map(|spec| choropleth_layer(&global, spec))
        .collect::<Result<Vec<_>>>()?;

    Ok(ChartBundle {
        latest_date: ranking.date,
        line_charts,
        ranking,
        vaccination_shares,
        maps,
    })
}
