//! Schema conformance for freshly parsed datasets.

use covid_common::{format_date, parse_date, parse_f64};
use covid_model::{DatasetTable, Field};
use polars::prelude::DataFrame;
use tracing::{debug, error, warn};

use crate::error::{IngestError, Result};

/// Validates and types a parsed source frame.
///
/// - every column in [`Field::REQUIRED_RAW`] must be present, otherwise
///   [`IngestError::MissingFields`] lists all of the absent ones
/// - numeric fields become `Float64`; blank cells are absent, and unparseable
///   or non-finite cells are absent and reported in a warning
/// - `location` and `iso_code` are trimmed, blank becomes absent
/// - `date` is normalized to `YYYY-MM-DD`; invalid dates become absent
///
/// Columns outside the schema are carried through unchanged.
pub fn conform_schema(mut df: DataFrame, origin: &str) -> Result<DatasetTable> {
    normalize_headers(&mut df)?;

    let table = DatasetTable::new(df);
    let missing: Vec<String> = Field::REQUIRED_RAW
        .iter()
        .filter(|field| !table.has_column(field.name()))
        .map(|field| field.name().to_string())
        .collect();
    if !missing.is_empty() {
        error!(origin, missing = ?missing, "source is missing required columns");
        return Err(IngestError::MissingFields {
            fields: missing,
            origin: origin.to_string(),
        });
    }

    let mut table = table;
    for field in Field::REQUIRED_RAW {
        table = match field {
            Field::Date => conform_dates(&table, origin)?,
            field if field.is_text() => conform_text(&table, field)?,
            field => conform_numeric(&table, field, origin)?,
        };
    }
    debug!(
        origin,
        rows = table.height(),
        columns = table.column_names().len(),
        "schema conformed"
    );
    Ok(table)
}

/// Strips surrounding whitespace and a UTF-8 byte order mark from headers.
fn normalize_headers(df: &mut DataFrame) -> Result<()> {
    let renames: Vec<(String, String)> = df
        .get_column_names()
        .into_iter()
        .filter_map(|name| {
            let cleaned = name.trim().trim_start_matches('\u{feff}').trim();
            (cleaned != name.as_str()).then(|| (name.to_string(), cleaned.to_string()))
        })
        .collect();
    for (old, new) in renames {
        df.rename(&old, new.into())?;
    }
    Ok(())
}

fn conform_text(table: &DatasetTable, field: Field) -> Result<DatasetTable> {
    let values = table.string_values(field.name())?;
    Ok(table.with_string_column(field.name(), values)?)
}

fn conform_dates(table: &DatasetTable, origin: &str) -> Result<DatasetTable> {
    let raw = table.string_values(Field::Date.name())?;
    let mut invalid = 0usize;
    let mut example = None;
    let values: Vec<Option<String>> = raw
        .into_iter()
        .map(|cell| {
            let text = cell?;
            match parse_date(&text) {
                Some(date) => Some(format_date(date)),
                None => {
                    invalid += 1;
                    example.get_or_insert(text);
                    None
                }
            }
        })
        .collect();
    if invalid > 0 {
        warn!(
            origin,
            invalid,
            example = example.as_deref().unwrap_or_default(),
            "unparseable dates treated as absent"
        );
    }
    Ok(table.with_string_column(Field::Date.name(), values)?)
}

fn conform_numeric(table: &DatasetTable, field: Field, origin: &str) -> Result<DatasetTable> {
    let raw = table.string_values(field.name())?;
    let mut invalid = 0usize;
    let values: Vec<Option<f64>> = raw
        .into_iter()
        .map(|cell| {
            let text = cell?;
            let parsed = parse_f64(&text);
            if parsed.is_none() {
                invalid += 1;
            }
            parsed
        })
        .collect();
    if invalid > 0 {
        warn!(
            origin,
            column = field.name(),
            invalid,
            "unparseable numeric cells treated as absent"
        );
    }
    Ok(table.with_f64_column(field.name(), values)?)
}
