//! Dataset table type passed between pipeline stages.
//!
//! [`DatasetTable`] wraps a Polars `DataFrame` whose schema has been conformed
//! at load time: `location`, `iso_code` and `date` are text columns (dates in
//! `YYYY-MM-DD` form) and every numeric field is `Float64`. A null cell is an
//! absent value.
//!
//! Tables are values: every operation that changes content returns a new
//! table and leaves `self` untouched. Cloning is cheap because Polars columns
//! are reference counted.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use polars::prelude::{
    AnyValue, BooleanChunked, Column, DataFrame, DataType, NamedFrom, NewChunkedArray, Series,
};

use covid_common::{
    any_to_date, any_to_f64, any_to_string_non_empty, format_date, is_present,
};

use crate::error::{DataError, Result};
use crate::field::Field;
use crate::observation::{DerivedMetrics, Observation};

/// Context label used when a plain accessor cannot find its column.
const ACCESS_CONTEXT: &str = "dataset";

/// An ordered collection of daily observations, logically partitioned by
/// country.
#[derive(Debug, Clone, Default)]
pub struct DatasetTable {
    data: DataFrame,
}

impl DatasetTable {
    /// Wraps an already conformed `DataFrame`.
    pub fn new(data: DataFrame) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn into_inner(self) -> DataFrame {
        self.data
    }

    /// Returns the number of rows.
    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.data.column(name).is_ok()
    }

    /// Fails with [`DataError::MissingField`] naming the first absent column.
    pub fn require_columns<S: AsRef<str>>(&self, columns: &[S], context: &str) -> Result<()> {
        for column in columns {
            let name = column.as_ref();
            if !self.has_column(name) {
                return Err(DataError::missing_field(name, context));
            }
        }
        Ok(())
    }

    /// Fails with [`DataError::NonNumericField`] for the first column that
    /// does not hold numbers. Every column must exist.
    pub fn require_numeric<S: AsRef<str>>(&self, columns: &[S], context: &str) -> Result<()> {
        self.require_columns(columns, context)?;
        for column in columns {
            let name = column.as_ref();
            if !self.is_numeric_column(name)? {
                return Err(DataError::NonNumericField {
                    column: name.to_string(),
                    context: context.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Whether a column holds numbers rather than text.
    pub fn is_numeric_column(&self, name: &str) -> Result<bool> {
        Ok(matches!(
            self.column(name)?.dtype(),
            DataType::Float64
                | DataType::Float32
                | DataType::Int64
                | DataType::Int32
                | DataType::UInt64
                | DataType::UInt32
        ))
    }

    fn column(&self, name: &str) -> Result<&Column> {
        self.data
            .column(name)
            .map_err(|_| DataError::missing_field(name, ACCESS_CONTEXT))
    }

    fn map_cells<T>(&self, name: &str, convert: impl Fn(AnyValue<'_>) -> T) -> Result<Vec<T>> {
        let column = self.column(name)?;
        let mut values = Vec::with_capacity(self.height());
        for idx in 0..self.height() {
            values.push(convert(column.get(idx).unwrap_or(AnyValue::Null)));
        }
        Ok(values)
    }

    /// Reads a column as optional numbers.
    pub fn f64_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        self.map_cells(name, any_to_f64)
    }

    /// Reads a column as optional trimmed text; blank cells are absent.
    pub fn string_values(&self, name: &str) -> Result<Vec<Option<String>>> {
        self.map_cells(name, any_to_string_non_empty)
    }

    /// Reads a column as optional calendar dates.
    pub fn date_values(&self, name: &str) -> Result<Vec<Option<NaiveDate>>> {
        self.map_cells(name, any_to_date)
    }

    /// Per-row flag telling whether the cell holds a usable value.
    pub fn present_mask(&self, name: &str) -> Result<Vec<bool>> {
        self.map_cells(name, |value| is_present(&value))
    }

    /// Number of absent cells in a column.
    pub fn null_count(&self, name: &str) -> Result<usize> {
        Ok(self.column(name)?.null_count())
    }

    /// Distinct country identifiers in order of first appearance.
    pub fn countries(&self) -> Result<Vec<String>> {
        let mut seen = BTreeSet::new();
        let mut ordered = Vec::new();
        for country in self.string_values(Field::Location.name())?.into_iter().flatten() {
            if seen.insert(country.clone()) {
                ordered.push(country);
            }
        }
        Ok(ordered)
    }

    /// Returns a copy of this table with `name` replaced or appended.
    pub fn with_f64_column(&self, name: &str, values: Vec<Option<f64>>) -> Result<Self> {
        let mut data = self.data.clone();
        data.with_column(Series::new(name.into(), values))?;
        Ok(Self::new(data))
    }

    /// Returns a copy of this table with a text column replaced or appended.
    pub fn with_string_column(&self, name: &str, values: Vec<Option<String>>) -> Result<Self> {
        let mut data = self.data.clone();
        data.with_column(Series::new(name.into(), values))?;
        Ok(Self::new(data))
    }

    /// Returns the rows whose `keep` flag is set, in their original order.
    pub fn filter_rows(&self, keep: &[bool]) -> Result<Self> {
        let mask = BooleanChunked::from_slice("keep".into(), keep);
        Ok(Self::new(self.data.filter(&mask)?))
    }

    /// Builds a conformed table from typed rows.
    pub fn from_observations(rows: &[Observation]) -> Result<Self> {
        let text = |f: fn(&Observation) -> Option<String>| -> Vec<Option<String>> {
            rows.iter().map(f).collect()
        };
        let numeric = |f: fn(&Observation) -> Option<f64>| -> Vec<Option<f64>> {
            rows.iter().map(f).collect()
        };
        let non_empty = |value: &str| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        let columns: Vec<Column> = vec![
            Series::new(
                Field::Location.name().into(),
                text(|row| Some(row.country.clone())),
            )
            .into(),
            Series::new(
                Field::Date.name().into(),
                text(|row| Some(format_date(row.date))),
            )
            .into(),
            Series::new(
                Field::IsoCode.name().into(),
                rows.iter()
                    .map(|row| non_empty(&row.iso_code))
                    .collect::<Vec<_>>(),
            )
            .into(),
            Series::new(Field::TotalCases.name().into(), numeric(|row| row.total_cases)).into(),
            Series::new(Field::TotalDeaths.name().into(), numeric(|row| row.total_deaths)).into(),
            Series::new(Field::NewCases.name().into(), numeric(|row| row.new_cases)).into(),
            Series::new(
                Field::TotalVaccinations.name().into(),
                numeric(|row| row.total_vaccinations),
            )
            .into(),
            Series::new(
                Field::PeopleVaccinated.name().into(),
                numeric(|row| row.people_vaccinated),
            )
            .into(),
            Series::new(Field::Population.name().into(), numeric(|row| row.population)).into(),
            Series::new(
                Field::TotalCasesPerMillion.name().into(),
                numeric(|row| row.total_cases_per_million),
            )
            .into(),
            Series::new(
                Field::PeopleVaccinatedPerHundred.name().into(),
                numeric(|row| row.people_vaccinated_per_hundred),
            )
            .into(),
        ];
        Ok(Self::new(DataFrame::new(columns)?))
    }

    /// Typed view of every row.
    ///
    /// Fails with [`DataError::AbsentValue`] for a row without a country or a
    /// valid date; run the cleaner with `date` required first when the table
    /// may hold such rows.
    pub fn observations(&self) -> Result<Vec<Observation>> {
        self.require_columns(&Field::REQUIRED_RAW, "observations")?;
        let countries = self.string_values(Field::Location.name())?;
        let dates = self.date_values(Field::Date.name())?;
        let iso_codes = self.string_values(Field::IsoCode.name())?;
        let total_cases = self.f64_values(Field::TotalCases.name())?;
        let total_deaths = self.f64_values(Field::TotalDeaths.name())?;
        let new_cases = self.f64_values(Field::NewCases.name())?;
        let total_vaccinations = self.f64_values(Field::TotalVaccinations.name())?;
        let people_vaccinated = self.f64_values(Field::PeopleVaccinated.name())?;
        let population = self.f64_values(Field::Population.name())?;
        let per_million = self.f64_values(Field::TotalCasesPerMillion.name())?;
        let per_hundred = self.f64_values(Field::PeopleVaccinatedPerHundred.name())?;

        let mut rows = Vec::with_capacity(self.height());
        for idx in 0..self.height() {
            let country = countries[idx].clone().ok_or_else(|| DataError::AbsentValue {
                row: idx,
                column: Field::Location.name().to_string(),
            })?;
            let date = dates[idx].ok_or_else(|| DataError::AbsentValue {
                row: idx,
                column: Field::Date.name().to_string(),
            })?;
            rows.push(Observation {
                country,
                date,
                iso_code: iso_codes[idx].clone().unwrap_or_default(),
                total_cases: total_cases[idx],
                total_deaths: total_deaths[idx],
                new_cases: new_cases[idx],
                total_vaccinations: total_vaccinations[idx],
                people_vaccinated: people_vaccinated[idx],
                population: population[idx],
                total_cases_per_million: per_million[idx],
                people_vaccinated_per_hundred: per_hundred[idx],
            });
        }
        Ok(rows)
    }

    /// Typed view of the derived columns.
    ///
    /// `death_rate` and `vaccination_rate` must exist; a missing
    /// `new_cases_smoothed` column reads as undefined on every row.
    pub fn derived_metrics(&self) -> Result<Vec<DerivedMetrics>> {
        self.require_columns(
            &[Field::DeathRate, Field::VaccinationRate],
            "derived_metrics",
        )?;
        let death_rate = self.f64_values(Field::DeathRate.name())?;
        let vaccination_rate = self.f64_values(Field::VaccinationRate.name())?;
        let smoothed_name = Field::NewCases.smoothed_column();
        let smoothed = if self.has_column(&smoothed_name) {
            self.f64_values(&smoothed_name)?
        } else {
            vec![None; self.height()]
        };
        Ok((0..self.height())
            .map(|idx| DerivedMetrics {
                death_rate: death_rate[idx],
                vaccination_rate: vaccination_rate[idx],
                new_cases_smoothed: smoothed[idx],
            })
            .collect())
    }
}
