//! Per-country time series for line charts.

use chrono::NaiveDate;
use covid_model::{DatasetTable, Field, SmoothingOptions};
use covid_transform::partition_by_country;
use serde::Serialize;

use crate::error::Result;

/// One point of a line chart; `None` leaves a gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountrySeries {
    pub location: String,
    pub points: Vec<SeriesPoint>,
}

/// Title, axis label and source column of one line chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineChartSpec {
    pub title: String,
    pub y_label: String,
    pub column: String,
}

impl LineChartSpec {
    fn new(title: impl Into<String>, y_label: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            y_label: y_label.into(),
            column: column.into(),
        }
    }
}

/// The tracker's line charts. The smoothed chart is included only when a
/// rolling mean is configured.
pub fn line_chart_specs(smoothing: Option<&SmoothingOptions>) -> Vec<LineChartSpec> {
    let mut specs = vec![
        LineChartSpec::new(
            "Total COVID-19 Cases Over Time",
            "Total Cases",
            Field::TotalCases.name(),
        ),
        LineChartSpec::new(
            "Total COVID-19 Deaths Over Time",
            "Total Deaths",
            Field::TotalDeaths.name(),
        ),
    ];
    if let Some(smoothing) = smoothing {
        let label = match smoothing.field {
            Field::NewCases => "New Cases".to_string(),
            other => other.name().replace('_', " "),
        };
        specs.push(LineChartSpec::new(
            format!("Daily {label} ({}-day average)", smoothing.window),
            label,
            smoothing.column_name(),
        ));
    }
    specs.extend([
        LineChartSpec::new(
            "Case Fatality Rate Over Time",
            "Death Rate (Deaths/Cases)",
            Field::DeathRate.name(),
        ),
        LineChartSpec::new(
            "Total Vaccinations Over Time",
            "Total Vaccinations",
            Field::TotalVaccinations.name(),
        ),
        LineChartSpec::new(
            "Vaccination Rate (% Population) Over Time",
            "Vaccination Rate",
            Field::VaccinationRate.name(),
        ),
    ]);
    specs
}

/// Date-ordered `(date, value)` points of `column` for every country, in
/// order of each country's first appearance.
///
/// Rows without a location or a valid date are not plotted.
pub fn country_series(table: &DatasetTable, column: &str) -> Result<Vec<CountrySeries>> {
    table.require_numeric(&[column], "country_series")?;
    let partition = partition_by_country(table, "country_series")?;
    let dates = table.date_values(Field::Date.name())?;
    let values = table.f64_values(column)?;

    Ok(partition
        .groups
        .into_iter()
        .filter_map(|group| {
            let location = group.country?;
            let points = group
                .rows
                .iter()
                .filter_map(|&row| {
                    Some(SeriesPoint {
                        date: dates[row]?,
                        value: values[row],
                    })
                })
                .collect();
            Some(CountrySeries { location, points })
        })
        .collect())
}
