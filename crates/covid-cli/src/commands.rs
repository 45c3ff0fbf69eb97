use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use covid_cli::config::TrackerConfig;
use covid_cli::summary::{RunSummary, fields_table, profile_table};
use covid_ingest::{HttpFetcher, RecordSet, load_record_set};
use covid_model::Field;
use covid_report::{
    build_chart_bundle, country_overview, latest_date, latest_snapshot, missing_value_profile,
    share_of_total, top_n, write_chart_bundle, write_table_csv,
};
use covid_transform::run_pipeline;

use crate::cli::{ProfileArgs, RunArgs};

pub fn run_fields() {
    println!("{}", fields_table());
}

pub fn run_tracker(args: &RunArgs) -> Result<RunSummary> {
    let config =
        TrackerConfig::load(args.source.config.as_deref())?.with_overrides(&args.overrides());
    let run_span = info_span!("run", countries = config.pipeline.countries.len());
    let _run_guard = run_span.enter();
    let start = Instant::now();

    let records = load(&config)?;
    let output = run_pipeline(records.table(), &config.pipeline).context("clean dataset")?;
    let cleaned = &output.table;

    let smoothed = output.stats.smoothed_column.as_deref();
    let overview = country_overview(cleaned, smoothed).context("summarize countries")?;
    let global = latest_snapshot(records.table()).context("latest snapshot")?;
    let ranking = top_n(
        &global,
        Field::TotalCasesPerMillion.name(),
        config.report.top_n,
    )
    .context("rank countries")?;
    let shares = share_of_total(
        &latest_snapshot(cleaned).context("latest snapshot")?,
        Field::PeopleVaccinated.name(),
    )
    .context("vaccination shares")?;

    let mut outputs = Vec::new();
    if let Some(dir) = &args.output_dir {
        let csv_path = dir.join("cleaned.csv");
        write_table_csv(cleaned, &csv_path)
            .with_context(|| format!("write {}", csv_path.display()))?;
        outputs.push(csv_path);

        let bundle = build_chart_bundle(records.table(), cleaned, &config.chart_options())
            .context("build chart bundle")?;
        let json_path = dir.join("charts.json");
        write_chart_bundle(&bundle, &json_path)
            .with_context(|| format!("write {}", json_path.display()))?;
        outputs.push(json_path);
    }

    info!(
        rows_kept = output.stats.rows_kept,
        outputs = outputs.len(),
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );
    Ok(RunSummary {
        origin: records.origin().clone(),
        stats: output.stats,
        overview,
        ranking,
        shares,
        outputs,
    })
}

pub fn run_profile(args: &ProfileArgs) -> Result<()> {
    let config = TrackerConfig::load(args.source.config.as_deref())?
        .with_overrides(&args.source.overrides());
    let records = load(&config)?;
    let table = records.table();

    println!("Source: {}", records.origin());
    println!(
        "Dataset shape: {} rows x {} columns",
        table.height(),
        table.column_names().len()
    );
    if let Some(date) = latest_date(table)? {
        println!("Latest date: {date}");
    }
    let profile = missing_value_profile(table, args.limit).context("profile missing values")?;
    println!("Missing values per column:");
    println!("{}", profile_table(&profile));
    Ok(())
}

fn load(config: &TrackerConfig) -> Result<RecordSet> {
    let source = config.source.data_source();
    let fetcher = HttpFetcher::new().context("create HTTP client")?;
    load_record_set(&source, &fetcher)
        .with_context(|| format!("load dataset {}", source.local_path.display()))
}
