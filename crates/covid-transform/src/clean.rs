//! Final cleaning filter.

use covid_model::{DatasetTable, Result};
use tracing::debug;

use crate::stage::Stage;

/// Removes every row where any of `required` is absent.
///
/// Surviving rows keep their values and their relative order. An empty
/// `required` list keeps every row.
pub fn drop_incomplete<S: AsRef<str>>(
    table: &DatasetTable,
    required: &[S],
) -> Result<DatasetTable> {
    table.require_columns(required, Stage::Clean.name())?;

    let mut keep = vec![true; table.height()];
    for column in required {
        let present = table.present_mask(column.as_ref())?;
        for (flag, present) in keep.iter_mut().zip(present) {
            *flag &= present;
        }
    }

    let cleaned = table.filter_rows(&keep)?;
    debug!(
        rows_in = table.height(),
        rows_out = cleaned.height(),
        "incomplete rows dropped"
    );
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use covid_model::{DataError, Field, Observation};

    fn table() -> DatasetTable {
        let day = NaiveDate::from_ymd_opt(2021, 4, 1).unwrap();
        DatasetTable::from_observations(&[
            Observation::new("Kenya", day).with_cases(Some(1.0), Some(0.0)),
            Observation::new("Kenya", day).with_cases(Some(2.0), None),
            Observation::new("India", day).with_cases(None, Some(3.0)),
            Observation::new("India", day).with_cases(Some(4.0), Some(1.0)),
        ])
        .unwrap()
    }

    #[test]
    fn test_drops_rows_missing_any_required() {
        let cleaned = drop_incomplete(&table(), &[Field::TotalCases, Field::TotalDeaths]).unwrap();
        assert_eq!(
            cleaned.f64_values("total_cases").unwrap(),
            vec![Some(1.0), Some(4.0)]
        );
        // Zero is a value, not an absence.
        assert_eq!(
            cleaned.f64_values("total_deaths").unwrap(),
            vec![Some(0.0), Some(1.0)]
        );
    }

    #[test]
    fn test_no_required_fields_keeps_all() {
        let cleaned = drop_incomplete::<&str>(&table(), &[]).unwrap();
        assert_eq!(cleaned.height(), 4);
    }

    #[test]
    fn test_missing_required_column() {
        let err = drop_incomplete(&table(), &["death_rate"]).unwrap_err();
        assert!(matches!(
            err,
            DataError::MissingField { column, context }
                if column == "death_rate" && context == "drop_incomplete"
        ));
    }
}
