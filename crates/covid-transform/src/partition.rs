//! Explicit per-country partitioning.
//!
//! Fill and window operations never look at the table as a whole. They ask for
//! a [`CountryPartition`], run their computation on each group's date-ordered
//! slice, and scatter the results back to the original row positions.

use std::collections::BTreeMap;

use covid_model::{DatasetTable, Field, Result};

/// Rows belonging to one country, ordered by date ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryGroup {
    /// Country identifier; `None` collects rows without a `location`.
    pub country: Option<String>,
    /// Row indices into the source table. Rows sharing a date keep their
    /// original relative order.
    pub rows: Vec<usize>,
}

impl CountryGroup {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A table split into independent, date-ordered country sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryPartition {
    /// Groups in order of each country's first appearance in the table.
    pub groups: Vec<CountryGroup>,
    /// Rows without a valid date. They belong to no ordered sequence.
    pub undated: Vec<usize>,
}

impl CountryPartition {
    /// Runs `compute` over each group's values in date order and writes the
    /// results back into `base` at the rows they came from.
    ///
    /// `compute` receives exactly one group at a time and must return one
    /// value per input value. Rows outside every group keep their `base`
    /// value.
    pub fn map_groups<F>(
        &self,
        values: &[Option<f64>],
        mut base: Vec<Option<f64>>,
        mut compute: F,
    ) -> Vec<Option<f64>>
    where
        F: FnMut(&[Option<f64>]) -> Vec<Option<f64>>,
    {
        for group in &self.groups {
            let ordered: Vec<Option<f64>> = group.rows.iter().map(|&row| values[row]).collect();
            let computed = compute(&ordered);
            debug_assert_eq!(computed.len(), ordered.len());
            for (&row, value) in group.rows.iter().zip(computed) {
                base[row] = value;
            }
        }
        base
    }
}

/// Splits `table` into one date-ordered sequence per country.
///
/// `context` names the calling stage in the error raised when `location` or
/// `date` is missing.
pub fn partition_by_country(table: &DatasetTable, context: &str) -> Result<CountryPartition> {
    table.require_columns(&[Field::Location, Field::Date], context)?;
    let countries = table.string_values(Field::Location.name())?;
    let dates = table.date_values(Field::Date.name())?;

    let mut index: BTreeMap<Option<String>, usize> = BTreeMap::new();
    let mut partition = CountryPartition::default();
    for (row, (country, date)) in countries.into_iter().zip(&dates).enumerate() {
        if date.is_none() {
            partition.undated.push(row);
            continue;
        }
        let slot = *index.entry(country.clone()).or_insert_with(|| {
            partition.groups.push(CountryGroup {
                country,
                rows: Vec::new(),
            });
            partition.groups.len() - 1
        });
        partition.groups[slot].rows.push(row);
    }

    for group in &mut partition.groups {
        // Stable, so duplicate dates keep table order.
        group.rows.sort_by_key(|&row| dates[row]);
    }
    Ok(partition)
}
