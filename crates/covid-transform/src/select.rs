//! Country selection.

use std::collections::BTreeSet;

use covid_model::{DatasetTable, Field, Result};
use tracing::debug;

use crate::stage::Stage;

/// Keeps the rows whose `location` matches one of `countries`, in their
/// original order.
///
/// Identifiers are compared exactly after trimming surrounding whitespace.
/// Requested countries that do not occur are simply absent from the result,
/// and an empty request yields an empty table with the input's columns.
pub fn select<S: AsRef<str>>(table: &DatasetTable, countries: &[S]) -> Result<DatasetTable> {
    table.require_columns(&[Field::Location], Stage::Select.name())?;
    let wanted: BTreeSet<&str> = countries.iter().map(|c| c.as_ref().trim()).collect();
    let keep: Vec<bool> = table
        .string_values(Field::Location.name())?
        .iter()
        .map(|country| country.as_deref().is_some_and(|c| wanted.contains(c)))
        .collect();

    let selected = table.filter_rows(&keep)?;
    debug!(
        requested = wanted.len(),
        rows_in = table.height(),
        rows_out = selected.height(),
        "countries selected"
    );
    Ok(selected)
}
