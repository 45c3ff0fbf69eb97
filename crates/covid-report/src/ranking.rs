//! Bar and pie chart inputs.

use covid_model::{DatasetTable, Field};
use serde::Serialize;

use crate::error::Result;

/// One bar of a ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedValue {
    pub location: String,
    pub iso_code: Option<String>,
    pub value: f64,
}

/// One slice of a share-of-total chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub location: String,
    pub value: f64,
    /// Fraction of the total, in `0.0..=1.0`.
    pub share: f64,
}

impl Share {
    pub fn percent(&self) -> f64 {
        self.share * 100.0
    }
}

/// The `n` rows with the largest `column` values, largest first.
///
/// Rows with an absent value or no location are skipped. Equal values keep
/// table order.
pub fn top_n(table: &DatasetTable, column: &str, n: usize) -> Result<Vec<RankedValue>> {
    let (locations, values) = located_values(table, column, "top_n")?;
    let iso_codes = table.string_values(Field::IsoCode.name())?;

    let mut ranked: Vec<RankedValue> = locations
        .into_iter()
        .zip(values)
        .zip(iso_codes)
        .filter_map(|((location, value), iso_code)| {
            Some(RankedValue {
                location: location?,
                iso_code,
                value: value?,
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    ranked.truncate(n);
    Ok(ranked)
}

/// Each row's share of the summed `column`.
///
/// Absent and negative values are left out of both the slices and the total.
/// A total of zero yields no slices.
pub fn share_of_total(table: &DatasetTable, column: &str) -> Result<Vec<Share>> {
    let (locations, values) = located_values(table, column, "share_of_total")?;
    let entries: Vec<(String, f64)> = locations
        .into_iter()
        .zip(values)
        .filter_map(|(location, value)| Some((location?, value.filter(|v| *v >= 0.0)?)))
        .collect();

    let total: f64 = entries.iter().map(|(_, value)| value).sum();
    if total <= 0.0 {
        return Ok(Vec::new());
    }
    Ok(entries
        .into_iter()
        .map(|(location, value)| Share {
            location,
            value,
            share: value / total,
        })
        .collect())
}

type Located = (Vec<Option<String>>, Vec<Option<f64>>);

fn located_values(table: &DatasetTable, column: &str, context: &str) -> Result<Located> {
    table.require_numeric(&[column], context)?;
    table.require_columns(&[Field::Location, Field::IsoCode], context)?;
    let locations = table.string_values(Field::Location.name())?;
    let values = table.f64_values(column)?;
    Ok((locations, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use covid_model::{DataError, Observation};

    fn snapshot() -> DatasetTable {
        let day = NaiveDate::from_ymd_opt(2021, 9, 1).unwrap();
        let row = |country: &str, iso: &str, per_million: Option<f64>, vaccinated: Option<f64>| {
            let mut obs = Observation::new(country, day)
                .with_iso_code(iso)
                .with_vaccinations(None, vaccinated);
            obs.total_cases_per_million = per_million;
            obs
        };
        DatasetTable::from_observations(&[
            row("Kenya", "KEN", Some(4500.0), Some(300.0)),
            row("Germany", "DEU", Some(48000.0), Some(600.0)),
            row("India", "IND", None, Some(100.0)),
            row("Brazil", "BRA", Some(97000.0), None),
            row("Peru", "PER", Some(48000.0), Some(-5.0)),
        ])
        .unwrap()
    }

    #[test]
    fn test_top_n_descending_without_absent() {
        let top = top_n(&snapshot(), "total_cases_per_million", 3).unwrap();
        let names: Vec<&str> = top.iter().map(|r| r.location.as_str()).collect();
        assert_eq!(names, vec!["Brazil", "Germany", "Peru"]);
        assert_eq!(top[0].iso_code.as_deref(), Some("BRA"));

        let all = top_n(&snapshot(), "total_cases_per_million", 10).unwrap();
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn test_shares_skip_absent_and_negative() {
        let shares = share_of_total(&snapshot(), "people_vaccinated").unwrap();
        let slices: Vec<(&str, f64)> = shares
            .iter()
            .map(|s| (s.location.as_str(), s.percent()))
            .collect();
        assert_eq!(slices, vec![("Kenya", 30.0), ("Germany", 60.0), ("India", 10.0)]);
        let total: f64 = shares.iter().map(|s| s.share).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_total_has_no_slices() {
        let day = NaiveDate::from_ymd_opt(2021, 9, 1).unwrap();
        let table = DatasetTable::from_observations(&[
            Observation::new("Kenya", day).with_vaccinations(None, Some(0.0)),
        ])
        .unwrap();
        assert!(share_of_total(&table, "people_vaccinated").unwrap().is_empty());
    }

    #[test]
    fn test_text_column_rejected() {
        assert!(matches!(
            top_n(&snapshot(), "iso_code", 3),
            Err(crate::ReportError::Data(DataError::NonNumericField { .. }))
        ));
    }
}
