//! Per-country forward-fill.

use std::collections::BTreeMap;

use covid_model::{DatasetTable, Result};
use tracing::debug;

use crate::partition::{CountryPartition, partition_by_country};
use crate::stage::Stage;

/// Number of cells filled per field by one [`forward_fill_report`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillReport {
    pub filled: BTreeMap<String, usize>,
}

impl FillReport {
    pub fn total(&self) -> usize {
        self.filled.values().sum()
    }
}

/// Replaces each absent value with the most recent earlier value of the same
/// field in the same country.
///
/// A leading absent value stays absent. Rows without a valid date are never
/// filled and never used as a fill source. Fields are filled independently,
/// so their order does not matter.
pub fn forward_fill<S: AsRef<str>>(table: &DatasetTable, fields: &[S]) -> Result<DatasetTable> {
    forward_fill_report(table, fields).map(|(table, _)| table)
}

/// [`forward_fill`] that also reports how many cells each field gained.
pub fn forward_fill_report<S: AsRef<str>>(
    table: &DatasetTable,
    fields: &[S],
) -> Result<(DatasetTable, FillReport)> {
    let context = Stage::Impute.name();
    table.require_numeric(fields, context)?;

    let partition = partition_by_country(table, context)?;
    let mut report = FillReport::default();
    let mut result = table.clone();
    for field in fields {
        let name = field.as_ref();
        let (filled, count) = fill_column(&partition, &table.f64_values(name)?);
        report.filled.insert(name.to_string(), count);
        result = result.with_f64_column(name, filled)?;
    }
    debug!(
        groups = partition.groups.len(),
        undated = partition.undated.len(),
        filled = report.total(),
        "forward fill applied"
    );
    Ok((result, report))
}

fn fill_column(partition: &CountryPartition, values: &[Option<f64>]) -> (Vec<Option<f64>>, usize) {
    let filled = partition.map_groups(values, values.to_vec(), forward_fill_series);
    let count = values
        .iter()
        .zip(&filled)
        .filter(|(before, after)| before.is_none() && after.is_some())
        .count();
    (filled, count)
}

/// Forward-fills one already ordered series.
pub fn forward_fill_series(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut last = None;
    values
        .iter()
        .map(|value| {
            if value.is_some() {
                last = *value;
            }
            last
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use covid_model::{DataError, Field, Observation};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, d).unwrap()
    }

    #[test]
    fn test_series_fill() {
        let filled = forward_fill_series(&[None, Some(1.0), None, None, Some(4.0), None]);
        assert_eq!(
            filled,
            vec![None, Some(1.0), Some(1.0), Some(1.0), Some(4.0), Some(4.0)]
        );
    }

    #[test]
    fn test_fill_follows_date_not_row_order() {
        let table = DatasetTable::from_observations(&[
            Observation::new("Kenya", day(3)),
            Observation::new("Kenya", day(1)).with_cases(Some(10.0), Some(1.0)),
            Observation::new("Kenya", day(2)),
        ])
        .unwrap();

        let (filled, report) = forward_fill_report(&table, &["total_cases"]).unwrap();

        assert_eq!(
            filled.f64_values("total_cases").unwrap(),
            vec![Some(10.0), Some(10.0), Some(10.0)]
        );
        // Not requested, left as is.
        assert_eq!(
            filled.f64_values("total_deaths").unwrap(),
            vec![None, Some(1.0), None]
        );
        assert_eq!(report.filled["total_cases"], 2);
    }

    #[test]
    fn test_fill_never_crosses_countries() {
        let table = DatasetTable::from_observations(&[
            Observation::new("Kenya", day(1)).with_cases(Some(10.0), None),
            Observation::new("India", day(2)),
        ])
        .unwrap();
        let filled = forward_fill(&table, &[Field::TotalCases]).unwrap();
        assert_eq!(
            filled.f64_values("total_cases").unwrap(),
            vec![Some(10.0), None]
        );
    }

    #[test]
    fn test_undated_rows_neither_filled_nor_sources() {
        let table = DatasetTable::from_observations(&[
            Observation::new("Kenya", day(1)),
            Observation::new("Kenya", day(2)).with_cases(Some(7.0), None),
            Observation::new("Kenya", day(3)),
            Observation::new("Kenya", day(4)),
        ])
        .unwrap()
        .with_string_column(
            "date",
            vec![
                Some("2021-01-01".to_string()),
                None,
                Some("2021-01-03".to_string()),
                None,
            ],
        )
        .unwrap();

        let filled = forward_fill(&table, &["total_cases"]).unwrap();

        assert_eq!(
            filled.f64_values("total_cases").unwrap(),
            vec![None, Some(7.0), None, None]
        );
    }

    #[test]
    fn test_missing_field_is_fatal() {
        let table = DatasetTable::from_observations(&[Observation::new("Kenya", day(1))]).unwrap();
        let err = forward_fill(&table, &["hosp_patients"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "forward_fill: required column 'hosp_patients' not found"
        );
    }

    #[test]
    fn test_text_field_rejected() {
        let table = DatasetTable::from_observations(&[Observation::new("Kenya", day(1))]).unwrap();
        let err = forward_fill(&table, &[Field::IsoCode]).unwrap_err();
        assert!(matches!(err, DataError::NonNumericField { .. }));
    }

    #[test]
    fn test_empty_field_list_is_identity() {
        let table = DatasetTable::from_observations(&[Observation::new("Kenya", day(1))]).unwrap();
        let filled = forward_fill::<&str>(&table, &[]).unwrap();
        assert!(filled.data().equals_missing(table.data()));
    }
}
