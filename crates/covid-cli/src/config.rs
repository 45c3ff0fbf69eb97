//! Tracker configuration: built-in defaults, an optional TOML file, then
//! command-line overrides, each layer replacing what the previous one set.
//!
//! ```toml
//! [pipeline]
//! countries = ["Kenya", "India"]
//! fill_fields = ["total_cases", "total_deaths"]
//! required_fields = ["total_cases", "total_deaths", "date"]
//!
//! [pipeline.smoothing]
//! field = "new_cases"
//! window = 7
//!
//! [source]
//! data = "owid-covid-data.csv"
//! offline = true
//!
//! [report]
//! top_n = 10
//! ```

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use covid_ingest::{DEFAULT_DATA_PATH, DEFAULT_DATA_URL, DataSource};
use covid_model::{Field, PipelineOptions, SmoothingOptions};
use covid_report::{ChartOptions, DEFAULT_TOP_N};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub data: PathBuf,
    pub url: String,
    /// Never fall back to `url`.
    pub offline: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data: PathBuf::from(DEFAULT_DATA_PATH),
            url: DEFAULT_DATA_URL.to_string(),
            offline: false,
        }
    }
}

impl SourceConfig {
    pub fn data_source(&self) -> DataSource {
        let fallback = (!self.offline).then(|| self.url.clone());
        DataSource::local(&self.data).with_fallback_url(fallback)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Bars in the cases-per-million ranking.
    pub top_n: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Complete tracker configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub pipeline: PipelineOptions,
    pub source: SourceConfig,
    pub report: ReportConfig,
}

impl TrackerConfig {
    /// Reads a TOML file; keys it leaves out keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("parse config {}", path.display()))?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Defaults, overlaid with `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Applies command-line overrides on top of this configuration.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if !overrides.countries.is_empty() {
            self.pipeline.countries = overrides.countries.clone();
        }
        if overrides.no_smoothing {
            self.pipeline.smoothing = None;
        } else if overrides.window.is_some() || overrides.smooth_field.is_some() {
            let base = self.pipeline.smoothing.unwrap_or_default();
            self.pipeline.smoothing = Some(SmoothingOptions::new(
                overrides.smooth_field.unwrap_or(base.field),
                overrides.window.unwrap_or(base.window),
            ));
        }
        if let Some(data) = &overrides.data {
            self.source.data = data.clone();
        }
        if let Some(url) = &overrides.url {
            self.source.url = url.clone();
        }
        self.source.offline |= overrides.offline;
        if let Some(top_n) = overrides.top_n {
            self.report.top_n = top_n;
        }
        self
    }

    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            top_n: self.report.top_n,
            smoothing: self.pipeline.smoothing,
        }
    }
}

/// Values given on the command line. Unset fields leave the configuration
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub countries: Vec<String>,
    pub window: Option<NonZeroUsize>,
    pub smooth_field: Option<Field>,
    pub no_smoothing: bool,
    pub data: Option<PathBuf>,
    pub url: Option<String>,
    pub offline: bool,
    pub top_n: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_fallback_follows_offline() {
        let source = SourceConfig::default();
        assert_eq!(
            source.data_source().fallback_url.as_deref(),
            Some(DEFAULT_DATA_URL)
        );
        let offline = SourceConfig {
            offline: true,
            ..SourceConfig::default()
        };
        assert_eq!(offline.data_source().fallback_url, None);
    }

    #[test]
    fn test_window_override_keeps_configured_field() {
        let mut config = TrackerConfig::default();
        config.pipeline.smoothing = Some(SmoothingOptions::new(
            Field::TotalDeaths,
            NonZeroUsize::new(3).unwrap(),
        ));
        let overrides = ConfigOverrides {
            window: NonZeroUsize::new(14),
            ..ConfigOverrides::default()
        };

        let smoothing = config.with_overrides(&overrides).pipeline.smoothing.unwrap();

        assert_eq!(smoothing.field, Field::TotalDeaths);
        assert_eq!(smoothing.window.get(), 14);
    }

    #[test]
    fn test_no_smoothing_wins() {
        let overrides = ConfigOverrides {
            no_smoothing: true,
            window: NonZeroUsize::new(14),
            ..ConfigOverrides::default()
        };
        let config = TrackerConfig::default().with_overrides(&overrides);
        assert_eq!(config.pipeline.smoothing, None);
        assert_eq!(config.chart_options().smoothing, None);
    }
}
