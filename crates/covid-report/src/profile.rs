//! Missing-value profile of a table.

use covid_model::DatasetTable;
use serde::Serialize;

use crate::error::Result;

/// Absent-cell count for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnProfile {
    pub column: String,
    pub missing: usize,
    pub rows: usize,
}

impl ColumnProfile {
    /// Fraction of rows without a value, `0.0` for an empty table.
    pub fn missing_ratio(&self) -> f64 {
        if self.rows == 0 {
            0.0
        } else {
            self.missing as f64 / self.rows as f64
        }
    }
}

/// Counts absent cells per column, most incomplete first.
///
/// Ties are ordered by column name. At most `limit` entries are returned.
pub fn missing_value_profile(table: &DatasetTable, limit: usize) -> Result<Vec<ColumnProfile>> {
    let mut profile = Vec::new();
    for column in table.column_names() {
        let missing = table.null_count(&column)?;
        profile.push(ColumnProfile {
            column,
            missing,
            rows: table.height(),
        });
    }
    profile.sort_by(|a, b| b.missing.cmp(&a.missing).then_with(|| a.column.cmp(&b.column)));
    profile.truncate(limit);
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use covid_model::Observation;

    #[test]
    fn test_profile_sorted_and_truncated() {
        let day = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let table = DatasetTable::from_observations(&[
            Observation::new("Kenya", day)
                .with_cases(Some(1.0), None)
                .with_population(Some(10.0)),
            Observation::new("India", day).with_population(Some(20.0)),
        ])
        .unwrap();

        let profile = missing_value_profile(&table, 3).unwrap();

        let columns: Vec<(&str, usize)> = profile
            .iter()
            .map(|p| (p.column.as_str(), p.missing))
            .collect();
        assert_eq!(
            columns,
            vec![("iso_code", 2), ("new_cases", 2), ("people_vaccinated", 2)]
        );
        assert_eq!(profile[0].missing_ratio(), 1.0);
    }

    #[test]
    fn test_empty_table_ratio() {
        let table = DatasetTable::from_observations(&[]).unwrap();
        let profile = missing_value_profile(&table, 20).unwrap();
        assert_eq!(profile.len(), 11);
        assert!(profile.iter().all(|p| p.missing_ratio() == 0.0));
    }
}
