//! Latest-date snapshots.

use chrono::NaiveDate;
use covid_model::{DatasetTable, Field};

use crate::error::Result;

/// The most recent valid date in the table.
pub fn latest_date(table: &DatasetTable) -> Result<Option<NaiveDate>> {
    Ok(table
        .date_values(Field::Date.name())?
        .into_iter()
        .flatten()
        .max())
}

/// Rows dated on the table's most recent date, in table order.
///
/// An empty table, or one without any valid date, yields an empty snapshot.
pub fn latest_snapshot(table: &DatasetTable) -> Result<DatasetTable> {
    let dates = table.date_values(Field::Date.name())?;
    let latest = dates.iter().flatten().max().copied();
    let keep: Vec<bool> = dates
        .iter()
        .map(|date| date.is_some() && *date == latest)
        .collect();
    Ok(table.filter_rows(&keep)?)
}
