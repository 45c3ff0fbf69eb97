//! Terminal tables for command output.

use std::path::PathBuf;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use covid_common::{format_date, format_numeric};
use covid_ingest::SourceOrigin;
use covid_model::Field;
use covid_report::{ColumnProfile, CountryOverview, RankedValue, Share};
use covid_transform::PipelineStats;

/// Everything `run` reports once the pipeline has finished.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub origin: SourceOrigin,
    pub stats: PipelineStats,
    pub overview: Vec<CountryOverview>,
    pub ranking: Vec<RankedValue>,
    pub shares: Vec<Share>,
    /// Files written with `--output-dir`.
    pub outputs: Vec<PathBuf>,
}

pub fn print_run_summary(summary: &RunSummary) {
    println!("Source: {}", summary.origin);
    for line in stats_lines(&summary.stats) {
        println!("{line}");
    }
    println!(
        "{}",
        overview_table(&summary.overview, summary.stats.smoothed_column.as_deref())
    );
    if !summary.ranking.is_empty() {
        println!();
        println!("Top countries by total cases per million:");
        println!("{}", ranking_table(&summary.ranking));
    }
    if !summary.shares.is_empty() {
        println!();
        println!("Share of people vaccinated (latest date):");
        println!("{}", shares_table(&summary.shares));
    }
    for path in &summary.outputs {
        println!("Wrote {}", path.display());
    }
}

/// Plain-text lines describing a pipeline run.
pub fn stats_lines(stats: &PipelineStats) -> Vec<String> {
    let mut lines = vec![format!(
        "Rows: {} loaded, {} selected, {} kept ({} dropped)",
        stats.rows_loaded,
        stats.rows_selected,
        stats.rows_kept,
        stats.rows_dropped()
    )];
    let filled: Vec<String> = stats
        .filled
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(field, count)| format!("{field}={count}"))
        .collect();
    if !filled.is_empty() {
        lines.push(format!("Forward-filled: {}", filled.join(", ")));
    }
    if !stats.missing_countries.is_empty() {
        lines.push(format!(
            "Not in dataset: {}",
            stats.missing_countries.join(", ")
        ));
    }
    lines
}

/// Per-country overview; the rolling-mean column is shown only when
/// `smoothed_column` is set.
pub fn overview_table(overview: &[CountryOverview], smoothed_column: Option<&str>) -> Table {
    let mut table = Table::new();
    let mut header = vec![
        header_cell("Country"),
        header_cell("Rows"),
        header_cell("First"),
        header_cell("Last"),
        header_cell("Cases"),
        header_cell("Deaths"),
        header_cell("Death rate"),
        header_cell("Vaccinated"),
    ];
    if let Some(column) = smoothed_column {
        header.push(header_cell(&smoothed_label(column)));
    }
    table.set_header(header);
    apply_summary_table_style(&mut table);
    for index in [1, 4, 5, 6, 7, 8] {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for row in overview {
        let mut cells = vec![
            Cell::new(&row.location)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(row.rows),
            date_cell(row.first_date),
            date_cell(row.last_date),
            value_cell(row.total_cases),
            value_cell(row.total_deaths),
            rate_cell(row.death_rate),
            rate_cell(row.vaccination_rate),
        ];
        if smoothed_column.is_some() {
            cells.push(mean_cell(row.smoothed));
        }
        table.add_row(cells);
    }
    if overview.is_empty() {
        table.add_row(vec![dim_cell("no rows left after cleaning")]);
    }
    table
}

/// `new_cases_smoothed` → `new_cases (avg)`.
fn smoothed_label(column: &str) -> String {
    let field = column.strip_suffix("_smoothed").unwrap_or(column);
    format!("{field} (avg)")
}

pub fn ranking_table(ranking: &[RankedValue]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Country"),
        header_cell("ISO"),
        header_cell("Cases per million"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for (rank, entry) in ranking.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&entry.location),
            text_cell(entry.iso_code.as_deref()),
            Cell::new(format!("{:.1}", entry.value)),
        ]);
    }
    table
}

pub fn shares_table(shares: &[Share]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Country"),
        header_cell("People vaccinated"),
        header_cell("Share"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for share in shares {
        table.add_row(vec![
            Cell::new(&share.location),
            Cell::new(format_numeric(share.value)),
            Cell::new(format!("{:.1}%", share.percent())),
        ]);
    }
    table
}

pub fn profile_table(profile: &[ColumnProfile]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Missing"),
        header_cell("Missing %"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for column in profile {
        let count = if column.missing > 0 {
            Cell::new(column.missing).fg(Color::Yellow)
        } else {
            dim_cell(column.missing)
        };
        table.add_row(vec![
            Cell::new(&column.column),
            count,
            Cell::new(format!("{:.1}%", column.missing_ratio() * 100.0)),
        ]);
    }
    table
}

pub fn fields_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Kind"),
        header_cell("Source"),
    ]);
    apply_table_style(&mut table);
    for field in Field::ALL {
        let kind = if field.is_text() { "text" } else { "number" };
        let source = if field.is_derived() {
            Cell::new("derived").fg(Color::Green)
        } else {
            Cell::new("required")
        };
        table.add_row(vec![Cell::new(field.name()), Cell::new(kind), source]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn value_cell(value: Option<f64>) -> Cell {
    match value {
        Some(value) => Cell::new(format_numeric(value)),
        None => dim_cell("-"),
    }
}

/// Ratios are shown as percentages; anything above 100% is flagged.
fn rate_cell(value: Option<f64>) -> Cell {
    match value {
        Some(value) if value > 1.0 => Cell::new(format!("{:.2}%", value * 100.0)).fg(Color::Red),
        Some(value) => Cell::new(format!("{:.2}%", value * 100.0)),
        None => dim_cell("-"),
    }
}

fn mean_cell(value: Option<f64>) -> Cell {
    match value {
        Some(value) => Cell::new(format!("{value:.1}")),
        None => dim_cell("-"),
    }
}

fn date_cell(date: Option<chrono::NaiveDate>) -> Cell {
    match date {
        Some(date) => Cell::new(format_date(date)),
        None => dim_cell("-"),
    }
}

fn text_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_stats_lines() {
        let stats = PipelineStats {
            rows_loaded: 1200,
            rows_selected: 40,
            rows_kept: 36,
            filled: BTreeMap::from([
                ("total_cases".to_string(), 3),
                ("people_vaccinated".to_string(), 0),
            ]),
            missing_countries: vec!["Atlantis".to_string()],
            smoothed_column: Some("new_cases_smoothed".to_string()),
        };
        insta::assert_snapshot!(stats_lines(&stats).join("\n"), @r"
        Rows: 1200 loaded, 40 selected, 36 kept (4 dropped)
        Forward-filled: total_cases=3
        Not in dataset: Atlantis
        ");
    }

    #[test]
    fn test_fields_table_lists_every_field() {
        let mut table = fields_table();
        table.force_no_tty();
        let rendered = table.to_string();
        for field in Field::ALL {
            assert!(rendered.contains(field.name()), "missing {field}");
        }
    }

    fn kenya() -> CountryOverview {
        CountryOverview {
            location: "Kenya".to_string(),
            rows: 3,
            first_date: None,
            last_date: None,
            total_cases: Some(300.0),
            total_deaths: Some(15.0),
            death_rate: Some(0.05),
            vaccination_rate: None,
            smoothed: Some(12.5),
        }
    }

    #[test]
    fn test_overview_header_follows_smoothed_field() {
        let mut table = overview_table(&[kenya()], Some("total_deaths_smoothed"));
        table.force_no_tty();
        let rendered = table.to_string();
        assert!(rendered.contains("total_deaths (avg)"));
        assert!(rendered.contains("12.5"));
        assert!(!rendered.contains("new_cases"));
    }

    #[test]
    fn test_overview_without_smoothing_has_no_average_column() {
        let mut table = overview_table(&[kenya()], None);
        table.force_no_tty();
        let rendered = table.to_string();
        assert!(!rendered.contains("(avg)"));
        assert!(!rendered.contains("12.5"));
        assert_eq!(table.column_count(), 8);
    }

    #[test]
    fn test_empty_overview_has_placeholder() {
        let mut table = overview_table(&[], None);
        table.force_no_tty();
        assert!(table.to_string().contains("no rows left after cleaning"));
    }
}
