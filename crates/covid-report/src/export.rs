//! File exports of the cleaned table and the chart bundle.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use covid_model::DatasetTable;
use polars::prelude::{CsvWriter, SerWriter};
use tracing::info;

use crate::bundle::ChartBundle;
use crate::error::{ReportError, Result};

/// Writes `table` as a headed CSV file, creating parent directories.
pub fn write_table_csv(table: &DatasetTable, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let file = File::create(path).map_err(|source| io_error(path, source))?;
    let mut data = table.data().clone();
    CsvWriter::new(BufWriter::new(file))
        .include_header(true)
        .finish(&mut data)
        .map_err(|e| ReportError::CsvWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    info!(path = %path.display(), rows = table.height(), "table exported");
    Ok(())
}

/// Writes `bundle` as pretty-printed JSON, creating parent directories.
pub fn write_chart_bundle(bundle: &ChartBundle, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(bundle)?;
    ensure_parent(path)?;
    fs::write(path, format!("{json}\n")).map_err(|source| io_error(path, source))?;
    info!(path = %path.display(), charts = bundle.line_charts.len(), "chart bundle exported");
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => fs::create_dir_all(parent).map_err(|source| io_error(parent, source)),
        None => Ok(()),
    }
}

fn io_error(path: &Path, source: std::io::Error) -> ReportError {
    ReportError::Io {
        path: path.to_path_buf(),
        source,
    }
}
