//! CLI argument definitions for the COVID-19 tracker.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use covid_cli::config::ConfigOverrides;
use covid_model::Field;

#[derive(Parser)]
#[command(
    name = "covid-tracker",
    version,
    about = "COVID-19 Global Data Tracker - clean and summarize per-country statistics",
    long_about = "Load the Our World in Data COVID-19 dataset, select countries, forward-fill \
                  cumulative series, derive death and vaccination rates, smooth daily new \
                  cases and report the cleaned result."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the cleaning pipeline and print a per-country summary.
    Run(RunArgs),

    /// Print the dataset shape and its most incomplete columns.
    Profile(ProfileArgs),

    /// List the dataset fields the tracker knows about.
    Fields,
}

/// Dataset location flags shared by every command that loads data.
#[derive(Args)]
pub struct SourceArgs {
    /// TOML configuration file.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Local dataset CSV (default: owid-covid-data.csv).
    #[arg(long = "data", value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// URL fetched when the local dataset does not exist.
    #[arg(long = "url", value_name = "URL")]
    pub url: Option<String>,

    /// Never download; fail when the local dataset is missing.
    #[arg(long = "offline")]
    pub offline: bool,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Country to track (repeatable; replaces the configured list).
    #[arg(long = "country", value_name = "NAME")]
    pub countries: Vec<String>,

    /// Rolling-mean window in days.
    #[arg(long = "window", value_name = "DAYS")]
    pub window: Option<NonZeroUsize>,

    /// Field to smooth (default: new_cases).
    #[arg(long = "smooth-field", value_name = "FIELD")]
    pub smooth_field: Option<Field>,

    /// Skip the rolling mean.
    #[arg(long = "no-smoothing", conflicts_with_all = ["window", "smooth_field"])]
    pub no_smoothing: bool,

    /// Number of countries in the cases-per-million ranking.
    #[arg(long = "top", value_name = "N")]
    pub top_n: Option<usize>,

    /// Write cleaned.csv and charts.json into this directory.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct ProfileArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Number of columns to list.
    #[arg(long = "limit", default_value_t = 20)]
    pub limit: usize,
}

impl SourceArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            data: self.data.clone(),
            url: self.url.clone(),
            offline: self.offline,
            ..ConfigOverrides::default()
        }
    }
}

impl RunArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            countries: self.countries.clone(),
            window: self.window,
            smooth_field: self.smooth_field,
            no_smoothing: self.no_smoothing,
            top_n: self.top_n,
            ..self.source.overrides()
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
