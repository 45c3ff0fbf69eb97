//! Per-country overview of a cleaned table.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use covid_model::{DatasetTable, Field};
use serde::Serialize;

use crate::error::Result;
use crate::series::country_series;

/// Row count, date span and most recent values for one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryOverview {
    pub location: String,
    pub rows: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub total_cases: Option<f64>,
    pub total_deaths: Option<f64>,
    pub death_rate: Option<f64>,
    pub vaccination_rate: Option<f64>,
    /// Latest rolling mean, when `smoothed_column` was given and exists.
    pub smoothed: Option<f64>,
}

/// One overview per country, in order of first appearance.
///
/// "Latest" values come from each country's most recent dated row, so an
/// absent value there reads as absent. Columns missing from `table` read as
/// absent for every country.
pub fn country_overview(
    table: &DatasetTable,
    smoothed_column: Option<&str>,
) -> Result<Vec<CountryOverview>> {
    let spine = country_series(table, Field::TotalCases.name())?;
    let latest = |column: Option<&str>| -> Result<BTreeMap<String, Option<f64>>> {
        let Some(column) = column.filter(|c| table.has_column(c)) else {
            return Ok(BTreeMap::new());
        };
        Ok(country_series(table, column)?
            .into_iter()
            .map(|series| {
                let last = series.points.last().and_then(|point| point.value);
                (series.location, last)
            })
            .collect())
    };
    let deaths = latest(Some(Field::TotalDeaths.name()))?;
    let death_rate = latest(Some(Field::DeathRate.name()))?;
    let vaccination_rate = latest(Some(Field::VaccinationRate.name()))?;
    let smoothed = latest(smoothed_column)?;
    let lookup = |map: &BTreeMap<String, Option<f64>>, location: &str| {
        map.get(location).copied().flatten()
    };

    Ok(spine
        .into_iter()
        .map(|series| CountryOverview {
            rows: series.points.len(),
            first_date: series.points.first().map(|point| point.date),
            last_date: series.points.last().map(|point| point.date),
            total_cases: series.points.last().and_then(|point| point.value),
            total_deaths: lookup(&deaths, &series.location),
            death_rate: lookup(&death_rate, &series.location),
            vaccination_rate: lookup(&vaccination_rate, &series.location),
            smoothed: lookup(&smoothed, &series.location),
            location: series.location,
        })
        .collect())
}
