//! Configuration options for one pipeline invocation.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::field::Field;

/// Countries the tracker follows when none are configured.
pub const DEFAULT_COUNTRIES: [&str; 6] = [
    "Kenya",
    "United States",
    "India",
    "Brazil",
    "Germany",
    "South Africa",
];

/// Rolling-mean window used for daily new cases.
pub const DEFAULT_WINDOW: NonZeroUsize = NonZeroUsize::new(7).expect("window is non-zero");

/// Rolling-mean settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmoothingOptions {
    /// Field to smooth; the result lands in `<field>_smoothed`.
    pub field: Field,
    /// Number of trailing days averaged at each row.
    pub window: NonZeroUsize,
}

impl SmoothingOptions {
    pub fn new(field: Field, window: NonZeroUsize) -> Self {
        Self { field, window }
    }

    pub fn column_name(&self) -> String {
        self.field.smoothed_column()
    }
}

impl Default for SmoothingOptions {
    fn default() -> Self {
        Self::new(Field::NewCases, DEFAULT_WINDOW)
    }
}

/// Options controlling selection, imputation, smoothing and cleaning.
///
/// Missing keys in a config file fall back to [`PipelineOptions::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Country identifiers (the `location` column) to keep.
    pub countries: Vec<String>,

    /// Fields forward-filled within each country.
    pub fill_fields: Vec<Field>,

    /// Columns that must be present for a row to survive cleaning.
    ///
    /// Accepts any column name, including derived and smoothed columns.
    pub required_fields: Vec<String>,

    /// Rolling mean to compute, if any.
    pub smoothing: Option<SmoothingOptions>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            countries: DEFAULT_COUNTRIES.iter().map(|c| (*c).to_string()).collect(),
            fill_fields: Field::DEFAULT_FILL.to_vec(),
            required_fields: [Field::TotalCases, Field::TotalDeaths, Field::Date]
                .iter()
                .map(|field| field.name().to_string())
                .collect(),
            smoothing: Some(SmoothingOptions::default()),
        }
    }
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_countries<S: Into<String>>(mut self, countries: impl IntoIterator<Item = S>) -> Self {
        self.countries = countries.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_fill_fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fill_fields = fields.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_required_fields<S: Into<String>>(
        mut self,
        fields: impl IntoIterator<Item = S>,
    ) -> Self {
        self.required_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_smoothing(mut self, smoothing: Option<SmoothingOptions>) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Required column names as they appear in the table.
    ///
    /// Known field names and the smoothed column match case-insensitively,
    /// like [`Field::parse`], and are rewritten to their canonical spelling.
    /// Any other name is kept as given, trimmed.
    pub fn required_columns(&self) -> Vec<String> {
        let smoothed = self.smoothing.map(|smoothing| smoothing.column_name());
        self.required_fields
            .iter()
            .map(|required| {
                let required = required.trim();
                if let Ok(field) = Field::parse(required) {
                    return field.name().to_string();
                }
                match &smoothed {
                    Some(column) if column.eq_ignore_ascii_case(required) => column.clone(),
                    _ => required.to_string(),
                }
            })
            .collect()
    }

    /// Whether the smoothed column is one of the required fields, in which
    /// case it has to exist before the cleaner runs.
    pub fn smoothing_required(&self) -> bool {
        self.smoothing.is_some_and(|smoothing| {
            let column = smoothing.column_name();
            self.required_columns().contains(&column)
        })
    }
}
