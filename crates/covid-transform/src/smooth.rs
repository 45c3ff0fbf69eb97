//! Trailing rolling means.

use std::num::NonZeroUsize;

use covid_model::{DatasetTable, Result, smoothed_column_name};
use tracing::debug;

use crate::partition::partition_by_country;
use crate::stage::Stage;

/// Adds `<field>_smoothed`: for each row, the mean of the `window` most recent
/// values of `field` in the same country, ending at that row.
///
/// The value is undefined until a country has `window` dated rows, and
/// whenever any value inside the window is absent. Rows without a valid date
/// are undefined.
pub fn rolling_mean(
    table: &DatasetTable,
    field: &str,
    window: NonZeroUsize,
) -> Result<DatasetTable> {
    let context = Stage::Smooth.name();
    table.require_numeric(&[field], context)?;
    let partition = partition_by_country(table, context)?;

    let values = table.f64_values(field)?;
    let smoothed = partition.map_groups(&values, vec![None; values.len()], |group| {
        trailing_mean(group, window)
    });

    let column = smoothed_column_name(field);
    debug!(
        column = %column,
        window = window.get(),
        defined = smoothed.iter().flatten().count(),
        "rolling mean computed"
    );
    table.with_f64_column(&column, smoothed)
}

/// Full-window trailing mean over one ordered series.
///
/// Position `i` is defined only when `values[i + 1 - window..=i]` exists and
/// every value in it is present.
pub fn trailing_mean(values: &[Option<f64>], window: NonZeroUsize) -> Vec<Option<f64>> {
    let window = window.get();
    (0..values.len())
        .map(|end| {
            let start = (end + 1).checked_sub(window)?;
            let slice = &values[start..=end];
            let sum = slice.iter().copied().sum::<Option<f64>>()?;
            Some(sum / window as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use covid_model::{DataError, Observation};

    fn window(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 2, d).unwrap()
    }

    #[test]
    fn test_trailing_mean_full_window_only() {
        let values = [Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        assert_eq!(
            trailing_mean(&values, window(3)),
            vec![None, None, Some(2.0), Some(3.0)]
        );
    }

    #[test]
    fn test_trailing_mean_absent_poisons_window() {
        let values = [Some(1.0), None, Some(3.0), Some(4.0), Some(5.0)];
        assert_eq!(
            trailing_mean(&values, window(2)),
            vec![None, None, None, Some(3.5), Some(4.5)]
        );
    }

    #[test]
    fn test_window_of_one_is_identity() {
        let values = [Some(1.0), None, Some(3.0)];
        assert_eq!(trailing_mean(&values, window(1)), values.to_vec());
    }

    #[test]
    fn test_rolling_mean_per_country_in_date_order() {
        let table = DatasetTable::from_observations(&[
            Observation::new("Kenya", day(2)).with_new_cases(Some(20.0)),
            Observation::new("India", day(1)).with_new_cases(Some(100.0)),
            Observation::new("Kenya", day(1)).with_new_cases(Some(10.0)),
            Observation::new("India", day(2)).with_new_cases(Some(300.0)),
        ])
        .unwrap();

        let smoothed = rolling_mean(&table, "new_cases", window(2)).unwrap();

        assert_eq!(
            smoothed.f64_values("new_cases_smoothed").unwrap(),
            vec![Some(15.0), None, None, Some(200.0)]
        );
        assert_eq!(
            smoothed.f64_values("new_cases").unwrap(),
            table.f64_values("new_cases").unwrap()
        );
    }

    #[test]
    fn test_text_field_rejected() {
        let table = DatasetTable::from_observations(&[Observation::new("Kenya", day(1))]).unwrap();
        let err = rolling_mean(&table, "location", window(1)).unwrap_err();
        assert!(matches!(err, DataError::NonNumericField { context, .. } if context == "rolling_mean"));
    }
}
