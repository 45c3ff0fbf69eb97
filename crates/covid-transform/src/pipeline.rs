//! Linear pipeline runner.
//!
//! Stages run in a fixed order: select, forward fill, derive, then clean. The
//! rolling mean runs before cleaning when its column is one of the required
//! fields, and after cleaning otherwise, so the default pipeline smooths the
//! cleaned per-country series.

use std::collections::BTreeMap;
use std::time::Instant;

use covid_model::{DatasetTable, PipelineOptions, Result};
use tracing::{info, info_span, warn};

use crate::clean::drop_incomplete;
use crate::derive::derive_metrics;
use crate::impute::forward_fill_report;
use crate::select::select;
use crate::smooth::rolling_mean;
use crate::stage::Stage;

/// Row and value counts collected while the pipeline runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub rows_loaded: usize,
    pub rows_selected: usize,
    pub rows_kept: usize,
    /// Cells filled per field by the forward fill.
    pub filled: BTreeMap<String, usize>,
    /// Requested countries with no rows in the input.
    pub missing_countries: Vec<String>,
    /// Name of the rolling-mean column, when smoothing ran.
    pub smoothed_column: Option<String>,
}

impl PipelineStats {
    pub fn rows_dropped(&self) -> usize {
        self.rows_selected - self.rows_kept
    }
}

/// Cleaned table plus the statistics of the run that produced it.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub table: DatasetTable,
    pub stats: PipelineStats,
}

/// Runs every stage over `records` as configured by `options`.
///
/// `records` is left untouched. Fails on the first stage that cannot find a
/// column it needs; an empty selection is carried through to an empty output.
pub fn run_pipeline(records: &DatasetTable, options: &PipelineOptions) -> Result<PipelineOutput> {
    let start = Instant::now();
    let mut stats = PipelineStats {
        rows_loaded: records.height(),
        ..PipelineStats::default()
    };

    let selected = run_stage(Stage::Select, records, |table| {
        select(table, &options.countries)
    })?;
    stats.rows_selected = selected.height();
    stats.missing_countries = missing_countries(&selected, &options.countries)?;
    if !stats.missing_countries.is_empty() {
        warn!(
            countries = ?stats.missing_countries,
            "requested countries not present in dataset"
        );
    }

    let filled = run_stage(Stage::Impute, &selected, |table| {
        let (filled, report) = forward_fill_report(table, &options.fill_fields)?;
        stats.filled = report.filled;
        Ok(filled)
    })?;

    let mut table = run_stage(Stage::Derive, &filled, derive_metrics)?;

    let required = options.required_columns();
    let smooth_first = options.smoothing_required();
    if let Some(smoothing) = options.smoothing.filter(|_| smooth_first) {
        table = run_stage(Stage::Smooth, &table, |table| {
            rolling_mean(table, smoothing.field.name(), smoothing.window)
        })?;
    }

    table = run_stage(Stage::Clean, &table, |table| {
        drop_incomplete(table, &required)
    })?;

    if let Some(smoothing) = options.smoothing.filter(|_| !smooth_first) {
        table = run_stage(Stage::Smooth, &table, |table| {
            rolling_mean(table, smoothing.field.name(), smoothing.window)
        })?;
    }
    stats.smoothed_column = options.smoothing.map(|smoothing| smoothing.column_name());
    stats.rows_kept = table.height();

    info!(
        rows_loaded = stats.rows_loaded,
        rows_selected = stats.rows_selected,
        rows_kept = stats.rows_kept,
        duration_ms = start.elapsed().as_millis(),
        "pipeline complete"
    );
    Ok(PipelineOutput { table, stats })
}

fn run_stage<F>(stage: Stage, input: &DatasetTable, apply: F) -> Result<DatasetTable>
where
    F: FnOnce(&DatasetTable) -> Result<DatasetTable>,
{
    info_span!("stage", stage = stage.name()).in_scope(|| {
        let start = Instant::now();
        let output = apply(input)?;
        info!(
            rows_in = input.height(),
            rows_out = output.height(),
            duration_ms = start.elapsed().as_millis(),
            "{stage} complete"
        );
        Ok(output)
    })
}

fn missing_countries(selected: &DatasetTable, requested: &[String]) -> Result<Vec<String>> {
    let present = selected.countries()?;
    let mut missing: Vec<String> = Vec::new();
    for country in requested {
        let country = country.trim();
        if !present.iter().any(|p| p == country) && !missing.iter().any(|m| m == country) {
            missing.push(country.to_string());
        }
    }
    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    use chrono::NaiveDate;
    use covid_model::{Field, Observation, SmoothingOptions};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, d).unwrap()
    }

    fn records() -> DatasetTable {
        DatasetTable::from_observations(&[
            Observation::new("Kenya", day(1))
                .with_cases(Some(100.0), Some(5.0))
                .with_new_cases(Some(10.0)),
            Observation::new("Kenya", day(2)).with_new_cases(Some(20.0)),
            Observation::new("India", day(1)).with_new_cases(Some(1.0)),
            Observation::new("Kenya", day(3))
                .with_cases(Some(300.0), Some(15.0))
                .with_new_cases(Some(30.0)),
        ])
        .unwrap()
    }

    fn options() -> PipelineOptions {
        PipelineOptions::default()
            .with_countries(["Kenya", "India", "Atlantis"])
            .with_smoothing(Some(SmoothingOptions::new(
                Field::NewCases,
                NonZeroUsize::new(2).unwrap(),
            )))
    }

    #[test]
    fn test_stats_track_each_stage() {
        let output = run_pipeline(&records(), &options()).unwrap();
        let stats = output.stats;
        assert_eq!(stats.rows_loaded, 4);
        assert_eq!(stats.rows_selected, 4);
        // India has no cases at all, so it is dropped.
        assert_eq!(stats.rows_kept, 3);
        assert_eq!(stats.rows_dropped(), 1);
        assert_eq!(stats.filled["total_cases"], 1);
        assert_eq!(stats.filled["people_vaccinated"], 0);
        assert_eq!(stats.missing_countries, vec!["Atlantis"]);
        assert_eq!(stats.smoothed_column.as_deref(), Some("new_cases_smoothed"));
    }

    #[test]
    fn test_smoothing_after_cleaning_by_default() {
        let output = run_pipeline(&records(), &options()).unwrap();
        assert_eq!(
            output.table.f64_values("new_cases_smoothed").unwrap(),
            vec![None, Some(15.0), Some(25.0)]
        );
    }

    #[test]
    fn test_required_smoothed_column_filters_rows() {
        let options = options().with_required_fields(["total_cases", "new_cases_smoothed"]);
        let output = run_pipeline(&records(), &options).unwrap();
        assert_eq!(
            output.table.f64_values("new_cases_smoothed").unwrap(),
            vec![Some(15.0), Some(25.0)]
        );
    }

    #[test]
    fn test_required_fields_match_case_insensitively() {
        let options = options().with_required_fields(["Total_Cases", "New_Cases_Smoothed"]);
        let output = run_pipeline(&records(), &options).unwrap();
        assert_eq!(output.table.height(), 2);
        assert_eq!(
            output.table.f64_values("new_cases_smoothed").unwrap(),
            vec![Some(15.0), Some(25.0)]
        );
    }

    #[test]
    fn test_records_untouched() {
        let records = records();
        run_pipeline(&records, &options()).unwrap();
        assert!(!records.has_column("death_rate"));
        assert_eq!(records.height(), 4);
    }
}
